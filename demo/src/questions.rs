//! Static demo question bank.
//!
//! The runtime treats these as opaque collaborator input; they exist so the
//! scenarios have realistic items to collect answers for.

use vigil_contracts::question::{Question, QuestionKind};

/// The five-item demo assessment.
pub fn question_bank() -> Vec<Question> {
    vec![
        Question {
            id: "Q1".to_string(),
            kind: QuestionKind::MultipleChoice,
            text: "What is the primary purpose of browser enforcement in secure testing?"
                .to_string(),
            options: vec![
                "To increase page load speed".to_string(),
                "To ensure a controlled, fair environment for all candidates".to_string(),
                "To force users to buy specific software".to_string(),
                "To track user browsing history".to_string(),
            ],
            correct_index: Some(1),
            placeholder: None,
        },
        Question {
            id: "Q2".to_string(),
            kind: QuestionKind::ShortAnswer,
            text: "In one or two words, what is the term for a user moving focus away from \
                   the test window?"
                .to_string(),
            options: vec![],
            correct_index: None,
            placeholder: Some("Enter your answer here...".to_string()),
        },
        Question {
            id: "Q3".to_string(),
            kind: QuestionKind::MultipleChoice,
            text: "Which event should definitely be logged during a secure test?".to_string(),
            options: vec![
                "Mouse movement distance".to_string(),
                "Screen resolution changes".to_string(),
                "Tab focus/blur events".to_string(),
                "Operating system version".to_string(),
            ],
            correct_index: Some(2),
            placeholder: None,
        },
        Question {
            id: "Q4".to_string(),
            kind: QuestionKind::Essay,
            text: "Explain why full-screen enforcement is critical for maintaining the \
                   integrity of an online assessment."
                .to_string(),
            options: vec![],
            correct_index: None,
            placeholder: Some(
                "Write your explanation here (at least 50 words recommended)...".to_string(),
            ),
        },
        Question {
            id: "Q5".to_string(),
            kind: QuestionKind::MultipleChoice,
            text: "What does \"immutability post-submission\" mean for audit logs?".to_string(),
            options: vec![
                "Logs can be edited by candidates".to_string(),
                "Logs are deleted immediately after the test".to_string(),
                "Logs cannot be modified once the test is finished".to_string(),
                "Logs are only visible to the candidate".to_string(),
            ],
            correct_index: Some(2),
            placeholder: None,
        },
    ]
}
