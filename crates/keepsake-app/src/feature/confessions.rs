//! Confession roulette.
//!
//! The outcome of a shot is drawn before anything is shown. A sent
//! confession is kept in the history; a discarded one only earns points.

use keepsake_model::dates::datetime_stamp;
use keepsake_model::{Confession, Probability};
use keepsake_store::StateValue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Feature, FeatureContext, HelpEntry};
use crate::command::Command;
use crate::error::UserInputError;
use crate::screen::Screen;
use crate::view::FeatureKind;

/// Prompts offered to get a confession started.
pub const STARTERS: &[&str] = &[
    "One of the lines I hid from you is...",
    "I've never told you that...",
    "My most embarrassing moment was...",
];

const HELP: &[HelpEntry] = &[
    ("odds <10-50>", "Set the chance a confession is sent"),
    ("starter <n>", "Start from one of the prompts"),
    ("shoot <confession>", "Pull the trigger"),
    ("history", "Sent confessions and points"),
];

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Sent(String),
    Discarded { text: String, points: f64 },
}

pub struct ConfessionsFeature {
    rng: StdRng,
    last: Option<Outcome>,
    draft: Option<String>,
    showing_history: bool,
}

impl Default for ConfessionsFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfessionsFeature {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            last: None,
            draft: None,
            showing_history: false,
        }
    }

    fn render(&self, ctx: &FeatureContext) -> Screen {
        if self.showing_history {
            return Self::render_history(ctx);
        }
        let probability = ctx.store.probability();
        let mut screen = Screen::new("🎲 Confession Roulette")
            .line(format!(
                "Odds: {probability} sent, {}% discarded for +{} points",
                100 - u16::from(probability.percent()),
                probability.points()
            ))
            .blank()
            .line("Starters:")
            .lines(
                STARTERS
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("  {}. {s}", i + 1)),
            );
        if let Some(draft) = &self.draft {
            screen = screen.blank().line(format!("Draft: {draft}"));
        }
        match &self.last {
            Some(Outcome::Sent(text)) => screen
                .blank()
                .line("💥 BANG! Your confession is sent!")
                .line(format!("\"{text}\""))
                .line("💌 Your secret has been revealed!"),
            Some(Outcome::Discarded { text, points }) => screen
                .blank()
                .line("*CLICK* - Empty Chamber! Your confession is safe and discarded!")
                .line(format!("\"{text}\""))
                .line(format!("🏆 +{points} Points!"))
                .line(format!("Total Points: {}", ctx.store.points())),
            None => screen,
        }
    }

    fn render_history(ctx: &FeatureContext) -> Screen {
        let sent = ctx.store.confessions().get_sent();
        let screen = Screen::new("📜 Confession History")
            .line(format!("🏆 Points Accumulated: {}", ctx.store.points()))
            .blank();
        if sent.is_empty() {
            return screen.line("No confessions have been sent yet! 🤐");
        }
        screen.lines(sent.iter().map(|c| {
            format!(
                "💌 SENT {}: \"{}\" (at {}% probability)",
                c.date, c.confession, c.probability
            )
        }))
    }

    fn set_odds(ctx: &FeatureContext, value: &str) -> Result<(), UserInputError> {
        let probability = value
            .trim()
            .trim_end_matches('%')
            .parse::<i64>()
            .ok()
            .and_then(|p| Probability::new(p).ok())
            .ok_or_else(|| UserInputError::invalid("probability", value))?;
        ctx.store.set(StateValue::Probability(probability));
        Ok(())
    }

    fn starter(&mut self, command: &Command) -> Result<(), UserInputError> {
        let starter = command
            .position()
            .and_then(|i| STARTERS.get(i))
            .ok_or_else(|| UserInputError::invalid("starter", command.rest()))?;
        self.draft = Some((*starter).to_string());
        Ok(())
    }

    /// Draw the outcome, then record it.
    fn shoot(&mut self, ctx: &FeatureContext, text: &str) -> Result<(), UserInputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(UserInputError::Missing("Write a confession first."));
        }
        let probability = ctx.store.probability();
        let roll: f64 = self.rng.gen_range(0.0..100.0);
        let sent = roll < f64::from(probability.percent());
        tracing::debug!(roll, %probability, sent, "roulette");

        self.last = Some(if sent {
            ctx.store
                .confessions()
                .add(Confession::sent(text, probability, datetime_stamp()));
            Outcome::Sent(text.to_string())
        } else {
            let points = probability.points();
            ctx.store.confessions().add_points(points);
            Outcome::Discarded {
                text: text.to_string(),
                points,
            }
        });
        self.draft = None;
        Ok(())
    }
}

impl Feature for ConfessionsFeature {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Confessions
    }

    fn show(&mut self, ctx: &FeatureContext) -> Screen {
        self.render(ctx)
    }

    fn cleanup(&mut self) {
        self.last = None;
        self.draft = None;
        self.showing_history = false;
    }

    fn handle(&mut self, ctx: &FeatureContext, command: &Command) -> Option<Screen> {
        self.showing_history = false;
        let result = match command.verb() {
            "odds" => Self::set_odds(ctx, command.rest()),
            "starter" => self.starter(command),
            "shoot" => self.shoot(ctx, command.rest()),
            "history" => {
                self.showing_history = true;
                Ok(())
            }
            _ => return None,
        };
        if let Err(err) = result {
            ctx.reject(&err);
        }
        Some(self.render(ctx))
    }

    fn help(&self) -> &'static [HelpEntry] {
        HELP
    }
}
