use crate::domain::notes::Function;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// Distractors shown alongside the correct answer.
pub const MAX_DISTRACTORS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub prompt: String,
    pub sample_code: String,
    pub answer: String,
    pub choices: Vec<String>,
}

/// Builds a multiple-choice question from a drawn function and a pool of
/// other functions' outputs. The correct answer is always a member of
/// `choices`, and no choice duplicates its text.
pub fn build_question<R: Rng + ?Sized>(
    function: &Function,
    distractors: Vec<String>,
    rng: &mut R,
) -> Question {
    let mut choices: Vec<String> = distractors
        .into_iter()
        .filter(|d| *d != function.output)
        .take(MAX_DISTRACTORS)
        .collect();
    choices.push(function.output.clone());
    choices.shuffle(rng);

    Question {
        prompt: format!(
            "{}: {} What does this sample code output?",
            function.name, function.description
        ),
        sample_code: function.sample_code.clone(),
        answer: function.output.clone(),
        choices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_function(output: &str) -> Function {
        Function::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "count_up",
            "prints the numbers zero through two.",
            "for i in 0..3 { println!(\"{i}\") }",
            output,
        )
    }

    #[test]
    fn answer_is_always_among_the_choices() {
        let function = sample_function("0\n1\n2");
        let mut rng = rand::rng();
        for _ in 0..50 {
            let question = build_question(
                &function,
                vec!["a".to_string(), "b".to_string(), "c".to_string()],
                &mut rng,
            );
            assert!(question.choices.contains(&question.answer));
        }
    }

    #[test]
    fn choices_never_duplicate_the_answer() {
        let function = sample_function("42");
        let mut rng = rand::rng();
        let question = build_question(
            &function,
            vec!["42".to_string(), "41".to_string(), "40".to_string()],
            &mut rng,
        );
        let hits = question.choices.iter().filter(|c| **c == "42").count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn distractor_pool_is_capped() {
        let function = sample_function("x");
        let mut rng = rand::rng();
        let pool = (0..10).map(|i| i.to_string()).collect();
        let question = build_question(&function, pool, &mut rng);
        assert_eq!(question.choices.len(), MAX_DISTRACTORS + 1);
    }

    #[test]
    fn empty_pool_yields_a_single_choice() {
        let function = sample_function("only");
        let mut rng = rand::rng();
        let question = build_question(&function, Vec::new(), &mut rng);
        assert_eq!(question.choices, vec!["only".to_string()]);
    }

    #[test]
    fn prompt_names_the_function() {
        let function = sample_function("out");
        let mut rng = rand::rng();
        let question = build_question(&function, Vec::new(), &mut rng);
        assert!(question.prompt.contains("count_up"));
        assert_eq!(question.sample_code, function.sample_code);
    }
}
