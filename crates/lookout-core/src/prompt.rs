//! Prompt templates.

use chrono::{Datelike, Local, NaiveDate};

use crate::session::ConversationMessage;

/// Opening assistant message that sets the answering style for the session.
pub fn persona_message(today: NaiveDate) -> String {
    let date = today.format("%B %d, %Y");
    let year = today.year();
    format!(
        "always give me expected age to match {year}.\n\
         You are not just an extractor, you can also answer by inference.\n\
         You are a direct and concise information-retrieval assistant.\n\
         Today's date is {date}.\n\
         Bias toward using the most recent year ({year}) for dynamic facts \
         such as ages, office holders, current events, and trends.\n\
         - If the answer uses web search results, begin with: [FROM SEARCH]\n\
         - If the answer does not use web search results, begin with: [FROM MEMORY]\n\
         - Do not mention \"knowledge cutoff.\" Always assume data is up to date as of {date}.\n"
    )
}

/// Persona message for the current local date.
pub fn default_persona() -> String {
    persona_message(Local::now().date_naive())
}

/// Returns at most `limit` characters from the front of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// User turn that grounds the question in merged search results.
///
/// The context is cut to `context_limit` characters.
pub fn grounded_prompt(year: i32, context: &str, context_limit: usize, question: &str) -> String {
    format!(
        "The current year is {year}.\n\n\
         Using ONLY the following merged search results, give a single, clear, concise answer.\n\n\
         SEARCH RESULTS:\n---\n{}\n---\n\n\
         USER QUESTION: {question}",
        truncate_chars(context, context_limit)
    )
}

/// Messages for the post-generation cleanup call on background answers.
pub fn cleanup_messages(year: i32, entity: Option<&str>, raw_answer: &str) -> Vec<ConversationMessage> {
    vec![
        ConversationMessage::system(format!(
            "You are a cleanup assistant. \
             Remove irrelevant or repeated information, disclaimers, and produce a clean answer. \
             The current year is {year}. \
             Stay strictly on the given entity/topic."
        )),
        ConversationMessage::user(format!(
            "Entity: {}\nRaw answer: {raw_answer}",
            entity.unwrap_or("Unknown")
        )),
    ]
}

/// The current local year.
pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageRole;

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_grounded_prompt_caps_context() {
        let context = "x".repeat(12_050);
        let prompt = grounded_prompt(2026, &context, 12_000, "what happened?");

        assert!(prompt.starts_with("The current year is 2026."));
        assert!(prompt.contains(&format!("---\n{}\n---", "x".repeat(12_000))));
        assert!(!prompt.contains(&"x".repeat(12_001)));
        assert!(prompt.ends_with("USER QUESTION: what happened?"));
    }

    #[test]
    fn test_cleanup_messages_default_entity() {
        let messages = cleanup_messages(2026, None, "raw text");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert!(messages[0].content.contains("2026"));
        assert_eq!(messages[1].content, "Entity: Unknown\nRaw answer: raw text");
    }

    #[test]
    fn test_persona_mentions_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let persona = persona_message(date);
        assert!(persona.contains("October 16, 2026"));
        assert!(persona.contains("[FROM SEARCH]"));
    }
}
