// The fixed, ordered question list asked of every candidate document.
// Data, not logic: changing the batch means editing this slice only.
// Answers are always collected in this exact order.

pub const CANDIDATE_QUESTIONS: &[&str] = &[
    "What is the name of the job candidate?",
    "What are the specialities of this candidate?",
    "Please extract all hyperlinks.",
    "How many years of experience does this candidate have as a mobile developer?",
];
