use wiki_quiz_server::models::domain::QuizDocument;

pub fn sample_document(title: &str) -> QuizDocument {
    let questions: Vec<serde_json::Value> = (1..=5)
        .map(|n| {
            serde_json::json!({
                "question_id": format!("q{}", n),
                "text": format!("Question {} about {}?", n, title),
                "options": ["A", "B", "C", "D"],
                "answer": "B",
                "explanation": "B is stated in the article.",
                "difficulty": "medium"
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "id": 1,
        "title": title,
        "summary": format!("A quiz about {}.", title),
        "key_entities": ["one", "two", "three"],
        "organizations": ["Org A", "Org B"],
        "locations": [],
        "sections": ["History", "Legacy"],
        "suggested_topics": ["x", "y", "z"],
        "quiz": questions,
    }))
    .unwrap()
}
