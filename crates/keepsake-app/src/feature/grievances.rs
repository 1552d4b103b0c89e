//! Grievance tracker with two-click resolution.

use keepsake_model::{Grievance, Severity};
use keepsake_store::ConfirmStep;

use super::{Feature, FeatureContext, HelpEntry};
use crate::command::Command;
use crate::error::UserInputError;
use crate::screen::Screen;
use crate::view::FeatureKind;

const HELP: &[HelpEntry] = &[
    ("add [1-4] <details>", "File a grievance (severity defaults to 2)"),
    ("resolve <n>", "Resolve grievance n; click twice to confirm"),
];

#[derive(Debug, Default)]
pub struct GrievancesFeature;

impl GrievancesFeature {
    pub fn new() -> Self {
        Self
    }

    fn render(ctx: &FeatureContext) -> Screen {
        let grievances = ctx.store.grievances().get_all();
        let screen = Screen::new("📋 Grievances");
        if grievances.is_empty() {
            return screen.line("No grievances. All is well 💕");
        }
        screen.lines(grievances.iter().enumerate().map(|(i, g)| {
            let button = if g.click_count == 0 {
                "Resolved?"
            } else {
                "Confirm Resolved"
            };
            format!(
                "{:>3}. [{}] {} ({}) <{button}>",
                i + 1,
                g.severity.label(),
                g.details,
                g.date
            )
        }))
    }

    fn add(ctx: &FeatureContext, input: &str) -> Result<(), UserInputError> {
        let (severity, details) = split_severity(input)?;
        if details.is_empty() {
            return Err(UserInputError::Missing("Please enter grievance details."));
        }
        ctx.store.grievances().add(Grievance::new(details, severity));
        ctx.notifier.success("Grievance added to tracker");
        Ok(())
    }

    fn resolve(ctx: &FeatureContext, command: &Command) -> Result<(), UserInputError> {
        let index = command
            .position()
            .ok_or_else(|| UserInputError::invalid("grievance number", command.rest()))?;
        match ctx.store.grievances().resolve_click(index) {
            Some(ConfirmStep::Confirmed) => {
                ctx.notifier.success("Grievance resolved and removed! 🎉");
            }
            Some(ConfirmStep::Pending { remaining }) => {
                tracing::debug!(index, remaining, "grievance awaiting confirmation");
                ctx.notifier.info("Click once more to confirm resolution");
            }
            None => {
                return Err(UserInputError::NotFound {
                    what: "grievance",
                    index: index + 1,
                });
            }
        }
        Ok(())
    }
}

/// An optional leading severity level, then the details.
fn split_severity(input: &str) -> Result<(Severity, &str), UserInputError> {
    let input = input.trim();
    let (first, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    match first.parse::<i64>() {
        Ok(level) => {
            let severity = Severity::from_level(level)
                .map_err(|_| UserInputError::invalid("severity", first))?;
            Ok((severity, rest.trim()))
        }
        Err(_) => Ok((Severity::default(), input)),
    }
}

impl Feature for GrievancesFeature {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Grievances
    }

    fn show(&mut self, ctx: &FeatureContext) -> Screen {
        Self::render(ctx)
    }

    fn handle(&mut self, ctx: &FeatureContext, command: &Command) -> Option<Screen> {
        let result = match command.verb() {
            "add" => Self::add(ctx, command.rest()),
            "resolve" => Self::resolve(ctx, command),
            _ => return None,
        };
        if let Err(err) = result {
            ctx.reject(&err);
        }
        Some(Self::render(ctx))
    }

    fn help(&self) -> &'static [HelpEntry] {
        HELP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_store::GrievancesView;

    #[test]
    fn test_split_severity() {
        assert_eq!(
            split_severity("3 left the dishes"),
            Ok((Severity::High, "left the dishes"))
        );
        assert_eq!(
            split_severity("left the dishes"),
            Ok((Severity::Medium, "left the dishes"))
        );
        assert_eq!(split_severity("4"), Ok((Severity::Critical, "")));
        assert!(split_severity("9 too much").is_err());
    }

    #[test]
    fn test_resolve_threshold() {
        assert_eq!(GrievancesView::RESOLVE.threshold(), 2);
    }
}
