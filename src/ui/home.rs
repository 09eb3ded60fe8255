//! Marketing view: hero and feature grid.

use leptos::prelude::*;

use crate::ui::app::shell;
use crate::ui::components::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, SparklesIcon,
};

/// The four advertised capabilities shown in the feature grid.
const FEATURES: [(&str, &str); 4] = [
    (
        "Topics & Keywords",
        "Automatic extraction of themes and recurring motifs across scenes and scripts.",
    ),
    (
        "Named Entities",
        "Detect people, organizations, locations and link them in the graph.",
    ),
    (
        "Sentiment & Emotion",
        "Scene-level sentiment and emotion detection using transformer models.",
    ),
    (
        "Speaker & Scene Tagging",
        "Time-aligned speaker segmentation and scene metadata for precise search.",
    ),
];

/// Render the marketing page.
#[must_use]
pub fn page() -> String {
    let content = view! {
        <Hero/>
        <Features/>
    }
    .to_html();

    shell("Home", &content)
}

/// Hero section with the product pitch and calls to action.
#[component]
fn Hero() -> impl IntoView {
    view! {
        <section class="hero">
            <div class="hero-grid">
                <div class="hero-left">
                    <h1>"AI-powered metadata for movie scripts & transcripts"</h1>
                    <p class="lead">
                        "Extract topics, named entities, sentiments, speaker tags, and
                        scene-aligned metadata — then explore your corpus with a
                        conversational graph + vector agent."
                    </p>

                    <div class="hero-ctas">
                        <a href="/chat">
                            <Button variant=ButtonVariant::Primary size=ButtonSize::Lg>
                                <SparklesIcon/>
                                "Talk to the Agent"
                            </Button>
                        </a>
                        <a href="/rag">
                            <Button variant=ButtonVariant::Ghost size=ButtonSize::Lg>
                                "See features"
                            </Button>
                        </a>
                    </div>

                    <ul class="trust">
                        <li>"2,800+ scripts"</li>
                        <li>"Transformer embeddings"</li>
                        <li>"Neo4j graph + Chroma vector store"</li>
                    </ul>
                </div>

                <div class="hero-right" aria-hidden="true">
                    <div class="movie-card">
                        <div class="movie-title">"3:10 to Yuma"</div>
                        <div class="movie-meta">"Dialogue · Ben Wade"</div>
                        <p class="movie-snippet">
                            "\"You don't know what you're talking about... it's a matter of principle.\""
                        </p>
                        <div class="movie-tags">
                            <span>"Action"</span>
                            <span>"Drama"</span>
                            <span>"Western"</span>
                        </div>
                    </div>
                </div>
            </div>
        </section>
    }
}

/// Feature grid section.
#[component]
fn Features() -> impl IntoView {
    view! {
        <section id="features" class="features">
            <h2>"Core features"</h2>
            <div class="feature-grid">
                {FEATURES
                    .iter()
                    .map(|(title, blurb)| {
                        view! {
                            <Card class="feature-card">
                                <CardHeader>
                                    <h3>{*title}</h3>
                                </CardHeader>
                                <CardContent>
                                    <p>{*blurb}</p>
                                </CardContent>
                            </Card>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_page_carries_hero_and_features() {
        let page = page();
        assert!(page.contains("AI-powered metadata"));
        assert!(page.contains("Talk to the Agent"));
        assert!(page.contains("Core features"));
        // Titles contain escaped ampersands, so check the blurbs instead.
        for (_, blurb) in FEATURES {
            assert!(page.contains(blurb), "missing feature card: {blurb}");
        }
    }
}
