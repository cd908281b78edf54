use types::{
    Assignment, AssignmentId, Cohort, CohortId, Room, RoomId, ScheduleConfig, SlotId, Snapshot,
    Subject, SubjectId, Teacher, TeacherId,
};
use uuid::Uuid;

fn teacher(id: &str, name: &str, unavailable: &[&str]) -> Teacher {
    Teacher {
        id: TeacherId(id.into()),
        name: name.into(),
        unavailable_slots: unavailable.iter().map(|s| SlotId(s.to_string())).collect(),
    }
}

fn room(id: &str, name: &str, capacity: u32) -> Room {
    Room {
        id: RoomId(id.into()),
        name: name.into(),
        capacity,
        unavailable_slots: vec![],
    }
}

fn subject(name: &str, sks: u32) -> Subject {
    Subject {
        id: SubjectId(Uuid::new_v4().to_string()),
        name: name.into(),
        sks,
        unavailable_slots: vec![],
        fixed_slot: None,
    }
}

fn cohort(name: &str) -> Cohort {
    Cohort {
        id: CohortId(Uuid::new_v4().to_string()),
        name: name.into(),
    }
}

fn assign(teacher: &str, subject: &Subject, cohort: &Cohort, sks: i32) -> Assignment {
    Assignment {
        id: AssignmentId(Uuid::new_v4().to_string()),
        teacher_id: TeacherId(teacher.into()),
        subject_id: subject.id.clone(),
        cohort_id: cohort.id.clone(),
        sks,
    }
}

/// The demo dataset: three grades of curriculum over a Mon–Fri, 8-period
/// week, including a 6-unit workshop that has to split across blocks.
pub fn demo_snapshot() -> Snapshot {
    let config = ScheduleConfig {
        days: ["Mon", "Tue", "Wed", "Thu", "Fri"]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        periods_per_day: 8,
        max_block_duration: 3,
    };

    let teachers = vec![
        teacher("TCH-001", "Dr. Alan (CS)", &["Mon_1", "Mon_2"]),
        teacher("TCH-002", "Prof. Ada (Math)", &[]),
        teacher("TCH-003", "Mr. Newton (Phys)", &["Fri_7", "Fri_8"]),
        teacher("TCH-004", "Ms. Austen (Eng)", &["Wed_1", "Wed_2"]),
        teacher("TCH-005", "Mr. Herodotus (Hist)", &[]),
        teacher("TCH-006", "Dr. Darwin (Bio)", &["Tue_1"]),
    ];

    let rooms = vec![
        room("LAB-A", "Physics Lab", 30),
        room("LAB-B", "Bio/Chem Lab", 30),
        room("RM-101", "Lecture Hall A", 50),
        room("RM-102", "Classroom 102", 30),
        room("RM-103", "Classroom 103", 30),
        room("GYM", "Gymnasium", 100),
    ];

    let mathematics = subject("Mathematics", 4);
    let physics = subject("Physics", 4);
    let computer_science = subject("Computer Science", 3);
    let english_lit = subject("English Lit", 2);
    let history = subject("History", 2);
    let biology = subject("Biology", 3);
    let physical_ed = subject("Physical Ed", 2);
    let adv_workshop = subject("Adv Workshop", 6);

    let grade_10 = cohort("Grade 10");
    let grade_11 = cohort("Grade 11");
    let grade_12 = cohort("Grade 12");

    let assignments = vec![
        assign("TCH-002", &mathematics, &grade_10, 4),
        assign("TCH-003", &physics, &grade_10, 3),
        assign("TCH-004", &english_lit, &grade_10, 2),
        assign("TCH-006", &physical_ed, &grade_10, 2),
        assign("TCH-002", &mathematics, &grade_11, 4),
        assign("TCH-001", &computer_science, &grade_11, 3),
        assign("TCH-006", &biology, &grade_11, 3),
        assign("TCH-005", &history, &grade_11, 2),
        assign("TCH-003", &adv_workshop, &grade_12, 6),
        assign("TCH-001", &computer_science, &grade_12, 4),
        assign("TCH-004", &english_lit, &grade_12, 2),
    ];

    Snapshot {
        config,
        teachers,
        rooms,
        subjects: vec![
            mathematics,
            physics,
            computer_science,
            english_lit,
            history,
            biology,
            physical_ed,
            adv_workshop,
        ],
        cohorts: vec![grade_10, grade_11, grade_12],
        assignments,
    }
}
