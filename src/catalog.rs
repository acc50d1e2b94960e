//! Static course table shown in the "know more" modal

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseDetail {
    pub description: &'static str,
    pub eligibility: &'static str,
    pub duration: &'static str,
    pub admission_process: &'static str,
    pub fees: &'static str,
}

pub const COURSES: &[(&str, CourseDetail)] = &[
    (
        "MBA",
        CourseDetail {
            description: "A two-year postgraduate management programme with specialisations in Finance, Marketing, Human Resources and Business Analytics.",
            eligibility: "Bachelor's degree in any discipline with at least 50% aggregate marks and a valid CAT/MAT/CMAT score.",
            duration: "2 Years (4 Semesters)",
            admission_process: "Entrance score shortlisting followed by group discussion and personal interview.",
            fees: "₹1,20,000 per year",
        },
    ),
    (
        "MCA",
        CourseDetail {
            description: "A postgraduate programme in computer applications covering software engineering, data structures, cloud computing and full-stack development.",
            eligibility: "BCA or B.Sc. (Computer Science / IT / Mathematics) with at least 50% aggregate marks.",
            duration: "2 Years (4 Semesters)",
            admission_process: "Merit in qualifying degree and university entrance test.",
            fees: "₹90,000 per year",
        },
    ),
    (
        "B.Tech",
        CourseDetail {
            description: "An undergraduate engineering degree offered in Computer Science, Electronics & Communication, Mechanical and Civil Engineering.",
            eligibility: "10+2 with Physics, Chemistry and Mathematics, minimum 60% aggregate marks.",
            duration: "4 Years (8 Semesters)",
            admission_process: "JEE Main rank followed by centralised state counselling.",
            fees: "₹1,10,000 per year",
        },
    ),
    (
        "BBA",
        CourseDetail {
            description: "An undergraduate business programme building foundations in management, accounting, economics and entrepreneurship.",
            eligibility: "10+2 in any stream with at least 45% aggregate marks.",
            duration: "3 Years (6 Semesters)",
            admission_process: "Merit in 10+2 followed by a personal interview.",
            fees: "₹60,000 per year",
        },
    ),
    (
        "BCA",
        CourseDetail {
            description: "An undergraduate programme in computer applications covering programming, databases, networking and web technologies.",
            eligibility: "10+2 in any stream with Mathematics or Computer Science, minimum 45% aggregate marks.",
            duration: "3 Years (6 Semesters)",
            admission_process: "Merit in 10+2 and document verification.",
            fees: "₹55,000 per year",
        },
    ),
    (
        "M.Tech",
        CourseDetail {
            description: "A postgraduate engineering programme with research-oriented tracks in Computer Science, VLSI Design and Structural Engineering.",
            eligibility: "B.Tech/B.E. in a relevant branch with at least 55% aggregate marks; GATE score preferred.",
            duration: "2 Years (4 Semesters)",
            admission_process: "GATE score or university entrance test followed by an interview.",
            fees: "₹85,000 per year",
        },
    ),
];

/// Resolve a tile title to its table entry; surrounding whitespace and ASCII case are ignored
pub fn lookup(name: &str) -> Option<(&'static str, &'static CourseDetail)> {
    let name = name.trim();
    COURSES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(key, detail)| (*key, detail))
}
