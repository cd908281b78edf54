use good_lp::{
    default_solver, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use timetable_core::{PlacementProblem, CONFLICT_ERROR};
use tracing::debug;
use types::{Placement, SolveOptions, SolveOutcome};

struct StartVar {
    block: usize,
    room: usize,
    start: usize,
    var: Variable,
}

/// Builds the Boolean placement model and hands it to CBC: one binary per
/// admitted `(block, room, start)` triple, exactly-one per block, and an
/// at-most-one over the variables covering each `(room, slot)`,
/// `(teacher, slot)` and `(cohort, slot)`. No objective; any feasible
/// point is a timetable.
pub(crate) fn solve_with_cbc(
    problem: &PlacementProblem,
    opts: &SolveOptions,
) -> anyhow::Result<SolveOutcome> {
    if problem.blocks.is_empty() {
        return Ok(SolveOutcome::Success { data: vec![] });
    }

    let mut triples: Vec<(usize, usize, usize)> = Vec::with_capacity(problem.candidate_count());
    for (block, domain) in problem.domains.iter().enumerate() {
        for cand in domain {
            triples.push((block, cand.room, cand.start));
        }
    }

    // The model has no objective, so which feasible point CBC reaches first
    // depends on variable order; shuffling it yields timetable variety.
    let seed = opts
        .randomize
        .then(|| opts.seed.unwrap_or_else(|| rand::thread_rng().gen_range(1..=10_000)));
    if let Some(seed) = seed {
        debug!(seed, "randomizing variable order");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        triples.shuffle(&mut rng);
    }

    let mut vars = ProblemVariables::new();
    let starts: Vec<StartVar> = triples
        .into_iter()
        .map(|(block, room, start)| StartVar {
            block,
            room,
            start,
            var: vars.add(good_lp::variable().binary()),
        })
        .collect();

    let mut model = vars.minimise(Expression::from(0.0)).using(default_solver);
    if let Some(seed) = seed {
        model.set_parameter("randomSeed", &seed.to_string());
        model.set_parameter("threads", "8");
    }
    if let Some(secs) = opts.time_limit_secs {
        model.set_parameter("seconds", &secs.to_string());
    }

    for block in 0..problem.blocks.len() {
        let mut sum = Expression::from(0.0);
        for s in starts.iter().filter(|s| s.block == block) {
            sum = sum + s.var;
        }
        model = model.with(sum.eq(1.0));
    }

    let mut room_cover: HashMap<(usize, usize), Vec<Variable>> = HashMap::new();
    let mut teacher_cover: HashMap<(&str, usize), Vec<Variable>> = HashMap::new();
    let mut cohort_cover: HashMap<(&str, usize), Vec<Variable>> = HashMap::new();
    for s in &starts {
        let block = &problem.blocks[s.block];
        for k in problem.occupied(s.block, s.start) {
            room_cover.entry((s.room, k)).or_default().push(s.var);
            teacher_cover
                .entry((block.teacher_id.0.as_str(), k))
                .or_default()
                .push(s.var);
            cohort_cover
                .entry((block.cohort_id.0.as_str(), k))
                .or_default()
                .push(s.var);
        }
    }
    model = at_most_one(model, room_cover.into_values());
    model = at_most_one(model, teacher_cover.into_values());
    model = at_most_one(model, cohort_cover.into_values());

    match model.solve() {
        Ok(sol) => {
            let mut placements = Vec::with_capacity(problem.blocks.len());
            for s in &starts {
                if sol.value(s.var) > 0.5 {
                    let block = &problem.blocks[s.block];
                    placements.push(Placement {
                        slot_id: problem.grid.slot(s.start).clone(),
                        duration: block.duration,
                        subject_name: block.subject_name.clone(),
                        teacher_id: block.teacher_id.clone(),
                        room_id: problem.rooms[s.room].id.clone(),
                        cohort_name: block.cohort_name.clone(),
                        block_id: block.block_id.clone(),
                    });
                }
            }
            Ok(SolveOutcome::Success { data: placements })
        }
        Err(ResolutionError::Infeasible) => Ok(SolveOutcome::failure(CONFLICT_ERROR)),
        Err(other) => Err(anyhow::anyhow!("milp backend failed: {other:?}")),
    }
}

fn at_most_one<M: SolverModel>(
    mut model: M,
    covers: impl Iterator<Item = Vec<Variable>>,
) -> M {
    for vars_at in covers {
        // A slot covered by a single variable cannot clash.
        if vars_at.len() > 1 {
            let mut sum = Expression::from(0.0);
            for v in vars_at {
                sum = sum + v;
            }
            model = model.with(sum.leq(1.0));
        }
    }
    model
}
