//! Fixed reply texts and the question-generation prompt.

use super::state::CandidateField;

/// Words that end the interview from any phase (compared trimmed, lowercased).
pub const EXIT_WORDS: &[&str] = &["exit", "quit", "bye"];

pub const WELCOME: &str = "👋 Hello! Welcome to TalentScout, your smart hiring assistant.";

pub const CLOSING: &str = "Thank you! Your responses have been saved. We'll be in touch.";

pub const ANSWER_NOTED: &str =
    "Answer noted. You can continue answering or type 'exit' to finish.";

pub const ANSWER_LIMIT_REACHED: &str =
    "You've reached the maximum number of answers for this session. Type 'exit' to finish.";

/// Whether `message` is an exit signal.
pub fn is_exit_signal(message: &str) -> bool {
    let folded = message.trim().to_lowercase();
    EXIT_WORDS.contains(&folded.as_str())
}

/// Greeting shown when a session opens: welcome line plus the first intake prompt.
pub fn greeting() -> String {
    format!("{WELCOME}\n\n{}", CandidateField::ALL[0].prompt())
}

/// Reply sent once intake completes.
pub fn questions_ready(questions: &str) -> String {
    format!(
        "Thank you! Based on your tech stack, here are your technical questions:\n\n\
         {questions}\n\n\
         Please answer them one at a time. Type 'exit' to finish."
    )
}

/// Question text stored when generation fails.
pub fn generation_failed(reason: &str) -> String {
    format!("Error generating questions: {reason}")
}

/// System prompt for the question-generation call.
pub fn interviewer_system_prompt(tech_stack: &str, language: &str) -> String {
    format!(
        "You are a multilingual technical interviewer. Respond in {language}.\n\
         Generate 3 to 5 intermediate-level technical interview questions for each \
         technology in: {tech_stack}.\n\
         Format clearly by technology."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_signal_is_trimmed_and_case_folded() {
        assert!(is_exit_signal("exit"));
        assert!(is_exit_signal("  QUIT \n"));
        assert!(is_exit_signal("Bye"));
        assert!(!is_exit_signal("goodbye"));
        assert!(!is_exit_signal("exit now"));
        assert!(!is_exit_signal(""));
    }

    #[test]
    fn greeting_ends_with_first_prompt() {
        let text = greeting();
        assert!(text.starts_with(WELCOME));
        assert!(text.ends_with("What is your full name?"));
    }

    #[test]
    fn questions_ready_embeds_questions() {
        let text = questions_ready("1. What is ownership?");
        assert!(text.contains("1. What is ownership?"));
        assert!(text.contains("one at a time"));
        assert!(text.contains("'exit'"));
    }

    #[test]
    fn interviewer_prompt_names_language_and_stack() {
        let prompt = interviewer_system_prompt("Python, Go", "Spanish");
        assert!(prompt.contains("Respond in Spanish"));
        assert!(prompt.contains("Python, Go"));
        assert!(prompt.contains("3 to 5"));
    }
}
