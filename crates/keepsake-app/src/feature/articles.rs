//! Article collection with concept prompts.

use keepsake_model::{Article, ArticleUpdate};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Feature, FeatureContext, HelpEntry};
use crate::command::{Command, parse_position};
use crate::error::UserInputError;
use crate::screen::Screen;
use crate::view::FeatureKind;

const MISSING_FIELDS: &str = "Please fill in at least the title and content!";
const NO_SELECTION: &str = "Please select at least one concept first! 💡";

const HELP: &[HelpEntry] = &[
    ("list", "List all articles"),
    ("read <n>", "Read article n"),
    ("concepts", "Show concept prompts"),
    ("concept <name>", "Select or deselect a concept"),
    ("random", "Toggle a random concept"),
    ("add-concept <name>", "Add a concept to the list"),
    ("use", "Write with the selected concepts"),
    ("write <title> | [concepts |] <text>", "Save a new article"),
    ("edit <n> <title> | [concepts |] <text>", "Rewrite article n"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    List,
    Concepts,
    Read(i64),
    Compose,
}

pub struct ArticlesFeature {
    mode: Mode,
    rng: StdRng,
}

impl Default for ArticlesFeature {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticlesFeature {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            mode: Mode::List,
            rng,
        }
    }

    fn render(&self, ctx: &FeatureContext) -> Screen {
        match self.mode {
            Mode::List => Self::render_list(ctx),
            Mode::Concepts => Self::render_concepts(ctx),
            Mode::Read(id) => match ctx.store.articles().get_by_id(id) {
                Some(article) => Self::render_article(&article),
                None => Self::render_list(ctx),
            },
            Mode::Compose => Self::render_compose(ctx),
        }
    }

    fn render_list(ctx: &FeatureContext) -> Screen {
        let articles = ctx.store.articles().get_all();
        let screen = Screen::new("📝 Our Article Collection");
        if articles.is_empty() {
            return screen.line("No articles yet. Write the first one with 'write'.");
        }
        screen.lines(articles.iter().enumerate().map(|(i, a)| {
            let concept = if a.concept.is_empty() {
                String::new()
            } else {
                format!(" [{}]", a.concept)
            };
            format!("{:>3}. {}{} ({})", i + 1, a.title, concept, a.date)
        }))
    }

    fn render_concepts(ctx: &FeatureContext) -> Screen {
        let concepts = ctx.store.concepts();
        let selected = concepts.get_selected();
        Screen::new("💡 Concepts")
            .lines(concepts.get_all().into_iter().map(|c| {
                let mark = if selected.contains(&c) { "x" } else { " " };
                format!("  [{mark}] {c}")
            }))
            .blank()
            .line(format!("Selected: {}", joined_or_none(&selected)))
    }

    fn render_article(article: &Article) -> Screen {
        let mut screen =
            Screen::new(article.title.clone()).line(format!("Written {}", article.date));
        if let Some(edited) = &article.last_edited {
            screen = screen.line(format!("Edited {edited}"));
        }
        if !article.concept.is_empty() {
            screen = screen.line(format!("Concepts: {}", article.concept));
        }
        screen.blank().line(article.content.clone())
    }

    fn render_compose(ctx: &FeatureContext) -> Screen {
        let selected = ctx.store.concepts().get_selected();
        Screen::new("✍️ New Article")
            .line(format!("Concepts: {}", selected.join(", ")))
            .line("Type: write <title> | <text>")
    }

    fn write(&mut self, ctx: &FeatureContext, command: &Command) -> Result<(), UserInputError> {
        let draft =
            Draft::parse(&command.fields()).ok_or(UserInputError::Missing(MISSING_FIELDS))?;
        let concept = draft
            .concept
            .unwrap_or_else(|| ctx.store.concepts().get_selected().join(", "));
        ctx.store
            .articles()
            .add(Article::new(draft.title, concept, draft.content));
        ctx.notifier.success("Article saved! 📝✨");
        self.finish_compose(ctx);
        Ok(())
    }

    fn edit(&mut self, ctx: &FeatureContext, command: &Command) -> Result<(), UserInputError> {
        let (position, rest) = command.split_first();
        let index = parse_position(position)
            .ok_or_else(|| UserInputError::invalid("article number", position))?;
        let article = ctx
            .store
            .articles()
            .get_all()
            .into_iter()
            .nth(index)
            .ok_or(UserInputError::NotFound {
                what: "article",
                index: index + 1,
            })?;
        let fields: Vec<&str> = rest.split('|').map(str::trim).collect();
        let draft = Draft::parse(&fields).ok_or(UserInputError::Missing(MISSING_FIELDS))?;
        let update = ArticleUpdate {
            title: Some(draft.title),
            concept: draft.concept,
            content: Some(draft.content),
        };
        if ctx.store.articles().update(article.id, update) {
            ctx.notifier.success("Article updated successfully! ✨");
        }
        self.finish_compose(ctx);
        Ok(())
    }

    fn finish_compose(&mut self, ctx: &FeatureContext) {
        ctx.store.concepts().clear_selection();
        self.mode = Mode::List;
    }

    fn read(&mut self, ctx: &FeatureContext, command: &Command) -> Result<(), UserInputError> {
        let index = command
            .position()
            .ok_or_else(|| UserInputError::invalid("article number", command.rest()))?;
        let article = ctx
            .store
            .articles()
            .get_all()
            .into_iter()
            .nth(index)
            .ok_or(UserInputError::NotFound {
                what: "article",
                index: index + 1,
            })?;
        self.mode = Mode::Read(article.id);
        Ok(())
    }

    fn toggle_concept(&mut self, ctx: &FeatureContext, name: &str) -> Result<(), UserInputError> {
        let concepts = ctx.store.concepts();
        if !concepts.get_all().iter().any(|c| c == name) {
            return Err(UserInputError::invalid("concept", name));
        }
        concepts.toggle_selection(name);
        self.mode = Mode::Concepts;
        Ok(())
    }

    fn add_concept(&mut self, ctx: &FeatureContext, name: &str) -> Result<(), UserInputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserInputError::Missing("Please enter a concept."));
        }
        if ctx.store.concepts().add(name) {
            ctx.notifier
                .success(&format!("\"{name}\" has been added to your concept list! 🎉"));
        } else {
            ctx.notifier
                .info(&format!("\"{name}\" is already in your concept list."));
        }
        self.mode = Mode::Concepts;
        Ok(())
    }

    fn use_selected(&mut self, ctx: &FeatureContext) -> Result<(), UserInputError> {
        if ctx.store.concepts().get_selected().is_empty() {
            return Err(UserInputError::Missing(NO_SELECTION));
        }
        self.mode = Mode::Compose;
        Ok(())
    }
}

impl Feature for ArticlesFeature {
    fn kind(&self) -> FeatureKind {
        FeatureKind::Articles
    }

    fn show(&mut self, ctx: &FeatureContext) -> Screen {
        self.render(ctx)
    }

    fn cleanup(&mut self) {
        self.mode = Mode::List;
    }

    fn handle(&mut self, ctx: &FeatureContext, command: &Command) -> Option<Screen> {
        let result = match command.verb() {
            "list" => {
                self.mode = Mode::List;
                Ok(())
            }
            "concepts" => {
                self.mode = Mode::Concepts;
                Ok(())
            }
            "read" => self.read(ctx, command),
            "concept" => self.toggle_concept(ctx, command.rest()),
            "random" => {
                let picked = ctx.store.concepts().random(&mut self.rng);
                tracing::debug!(?picked, "random concept");
                self.mode = Mode::Concepts;
                Ok(())
            }
            "add-concept" => self.add_concept(ctx, command.rest()),
            "use" => self.use_selected(ctx),
            "write" if command.rest().is_empty() => {
                self.mode = Mode::Compose;
                Ok(())
            }
            "write" => self.write(ctx, command),
            "edit" => self.edit(ctx, command),
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

/// Title, optional concept field and content from `|`-separated input.
struct Draft {
    title: String,
    concept: Option<String>,
    content: String,
}

impl Draft {
    fn parse(fields: &[&str]) -> Option<Self> {
        let (title, concept, content) = match fields {
            [title, content] => (*title, None, (*content).to_string()),
            [title, concept, rest @ ..] => (*title, Some((*concept).to_string()), rest.join(" | ")),
            _ => return None,
        };
        if title.is_empty() || content.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            concept,
            content,
        })
    }
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
