use crate::service::ClassificationResult;
use minijinja::{context, Environment};

const INDEX: &str = "index.html";

/// What the page shows under the form.
pub enum Outcome<'a> {
    Empty,
    Prediction(&'a ClassificationResult),
    Failure(&'a str),
}

/// The form page. The template name ends in `.html`, so every value is
/// HTML-escaped on output.
pub struct Page {
    env: Environment<'static>,
}

impl Page {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX, include_str!("templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        title: &str,
        text: &str,
        outcome: Outcome<'_>,
    ) -> Result<String, minijinja::Error> {
        let (label, score, error) = match outcome {
            Outcome::Empty => (None, None, None),
            // f32 -> string here; the template engine would widen to f64
            Outcome::Prediction(result) => {
                (Some(result.label.as_str()), Some(result.score.to_string()), None)
            }
            Outcome::Failure(message) => (None, None, Some(message)),
        };
        self.env.get_template(INDEX)?.render(context! {
            title,
            text,
            label,
            score,
            error,
        })
    }
}
