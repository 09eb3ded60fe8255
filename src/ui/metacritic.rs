//! Numeric prediction view and its result fragment.

use leptos::prelude::*;

use crate::backend::Prediction;
use crate::ui::app::shell;
use crate::ui::components::{Button, ClapperboardIcon, LoaderIcon};

/// The five numeric fields, in display order: form name and label.
const NUMERIC_FIELDS: [(&str, &str); 5] = [
    ("year", "Year"),
    ("imdb_rating", "IMDb User Rating"),
    ("imdb_votes", "IMDb Votes"),
    ("budget", "Budget ($)"),
    ("opening_weekend", "Opening Weekend ($)"),
];

/// Render the prediction form page.
#[must_use]
pub fn page() -> String {
    let content = view! {
        <div class="predictor">
            <h1 class="predictor-title">
                <ClapperboardIcon class="predictor-mark"/>
                "Metacritic Score Predictor"
            </h1>
            <p class="subtitle">
                "Enter movie details below and get an AI-powered predicted Metacritic score."
            </p>

            <form
                id="metacritic-form"
                class="form-box"
                hx-post="/api/metacritic"
                hx-target="#result-box"
                hx-swap="innerHTML"
                hx-disabled-elt="find button"
                hx-indicator="#predict-indicator"
            >
                {NUMERIC_FIELDS
                    .iter()
                    .map(|(name, label)| {
                        view! {
                            <div class="form-group">
                                <label>{*label}</label>
                                <input
                                    type="number"
                                    step="any"
                                    name=*name
                                    placeholder=format!("Enter {label}")
                                />
                            </div>
                        }
                    })
                    .collect_view()}

                <div class="form-group">
                    <label>"Movie Description"</label>
                    <textarea
                        name="text"
                        placeholder="Optional: plot summary or description"
                    ></textarea>
                </div>

                <Button button_type="submit" class="submit-btn">
                    "Predict Score"
                </Button>
                <div id="predict-indicator" class="htmx-indicator loading">
                    <LoaderIcon/>
                    "Predicting..."
                </div>
            </form>

            <div id="result-box" class="result-box"></div>
        </div>
    }
    .to_html();

    shell("Score Predictor", &content)
}

/// Render the prediction envelope, verbatim, for the result box.
#[must_use]
pub fn result_fragment(prediction: &Prediction) -> String {
    view! {
        {prediction
            .output
            .clone()
            .map(|output| view! { <p class="success">{output}</p> })}
        {prediction
            .error
            .clone()
            .map(|error| view! { <p class="error">{error}</p> })}
    }
    .to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_lists_all_form_fields() {
        let page = page();
        for (name, _) in NUMERIC_FIELDS {
            assert!(page.contains(&format!("name=\"{name}\"")), "missing field {name}");
        }
        assert!(page.contains("name=\"text\""));
        assert!(page.contains("Predict Score"));
    }

    #[test]
    fn result_fragment_shows_output_verbatim() {
        let html = result_fragment(&Prediction {
            output: Some("Predicted Metacritic Score: 74.5/100".into()),
            error: None,
        });
        assert!(html.contains("class=\"success\""));
        assert!(html.contains("Predicted Metacritic Score: 74.5/100"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn result_fragment_shows_error_verbatim() {
        let html = result_fragment(&Prediction {
            output: None,
            error: Some("Oops! Something went wrong: bad year".into()),
        });
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("bad year"));
    }
}
