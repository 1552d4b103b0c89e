//! Suggestions box: three lists, one per person plus a shared one.

use keepsake_model::{Suggestion, SuggestionBucket, SuggestionType, is_valid_url};

use super::{Feature, FeatureContext, HelpEntry};
use crate::command::{Command, parse_position};
use crate::error::UserInputError;
use crate::screen::Screen;
use crate::view::FeatureKind;

const HELP: &[HelpEntry] = &[
    ("type <movie|music|youtube|book|link>", "Pick what you are suggesting"),
    ("for-us", "Toggle between the shared list and theirs"),
    ("add <text or link>", "Add a suggestion"),
    ("done <list> <n>", "Toggle item n of a list (saleen, emran, us)"),
    ("filter <type>", "Show one type only; repeat to clear"),
];

pub struct SuggestionsFeature {
    kind: SuggestionType,
    for_us: bool,
    filter: Option<SuggestionType>,
}

impl Default for SuggestionsFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionsFeature {
    pub fn new() -> Self {
        Self {
            kind: SuggestionType::Link,
            for_us: true,
            filter: None,
        }
    }

    pub fn filter(&self) -> Option<SuggestionType> {
        self.filter
    }

    /// Items of `bucket` as shown: filtered, incomplete first, original order
    /// otherwise. Positions used by `done` refer to this order.
    fn visible(&self, ctx: &FeatureContext, bucket: SuggestionBucket) -> Vec<Suggestion> {
        let mut items: Vec<Suggestion> = ctx
            .store
            .suggestions()
            .bucket(bucket)
            .into_iter()
            .filter(|s| self.filter.is_none_or(|kind| s.kind == kind))
            .collect();
        items.sort_by_key(|s| s.completed);
        items
    }

    fn render(&self, ctx: &FeatureContext) -> Screen {
        let target = SuggestionBucket::target(ctx.session.user(), self.for_us);
        let mut screen = Screen::new("📬 Suggestions Box").line(format!(
            "Adding {} {} to: {}",
            self.kind.emoji(),
            self.kind.label(),
            target.title()
        ));
        if let Some(kind) = self.filter {
            screen = screen.line(format!("Filter: {} {}", kind.emoji(), kind.label()));
        }
        for bucket in SuggestionBucket::all() {
            screen = screen.blank().line(bucket.title());
            let items = self.visible(ctx, *bucket);
            if items.is_empty() {
                let empty = match self.filter {
                    Some(kind) => format!("  No suggestions match the '{}' filter.", kind.label()),
                    None => "  No suggestions yet! Add one below 👇".to_string(),
                };
                screen = screen.line(empty);
                continue;
            }
            screen = screen.lines(items.iter().enumerate().map(|(i, s)| {
                let check = if s.completed { "✓" } else { " " };
                format!(
                    "  {:>2}. [{check}] {} {} (from {}, {})",
                    i + 1,
                    s.kind.emoji(),
                    s.content,
                    s.from,
                    s.date
                )
            }));
        }
        screen
    }

    fn set_type(&mut self, value: &str) -> Result<(), UserInputError> {
        self.kind = value
            .parse()
            .map_err(|_| UserInputError::invalid("suggestion type", value))?;
        Ok(())
    }

    fn add(&mut self, ctx: &FeatureContext, content: &str) -> Result<(), UserInputError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(UserInputError::Missing("Please enter a suggestion."));
        }
        if is_valid_url(content) {
            self.kind = SuggestionType::Link;
        }
        let author = ctx.session.user();
        let bucket = SuggestionBucket::target(author, self.for_us);
        ctx.store
            .suggestions()
            .add(bucket, Suggestion::new(self.kind, content, author));
        ctx.notifier
            .success(&format!("Suggestion added! {}", self.kind.emoji()));
        Ok(())
    }

    fn toggle_done(&self, ctx: &FeatureContext, command: &Command) -> Result<(), UserInputError> {
        let (list, position) = command.split_first();
        let bucket: SuggestionBucket = list
            .parse()
            .map_err(|_| UserInputError::invalid("list", list))?;
        let index =
            parse_position(position).ok_or_else(|| UserInputError::invalid("position", position))?;
        let item = self
            .visible(ctx, bucket)
            .into_iter()
            .nth(index)
            .ok_or(UserInputError::NotFound {
                what: "suggestion",
                index: index + 1,
            })?;
        ctx.store.suggestions().toggle_completed(bucket, item.id);
        Ok(())
    }

    /// Choosing the active filter again clears it.
    fn set_filter(&mut self, value: &str) -> Result<(), UserInputError> {
        if value.trim().is_empty() {
            self.filter = None;
            return Ok(());
        }
        let kind: SuggestionType = value
            .parse()
            .map_err(|_| UserInputError::invalid("suggestion type", value))?;
        self.filter = if self.filter == Some(kind) {
            None
        } else {
            Some(kind)
        };
        Ok(())
    }
}

impl Feature for SuggestionsFeature {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Suggestions
    }

    fn show(&mut self, ctx: &FeatureContext) -> Screen {
        self.render(ctx)
    }

    fn cleanup(&mut self) {
        self.filter = None;
    }

    fn handle(&mut self, ctx: &FeatureContext, command: &Command) -> Option<Screen> {
        let result = match command.verb() {
            "type" => self.set_type(command.rest()),
            "for-us" => {
                self.for_us = !self.for_us;
                Ok(())
            }
            "add" => self.add(ctx, command.rest()),
            "done" => self.toggle_done(ctx, command),
            "filter" => self.set_filter(command.rest()),
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
