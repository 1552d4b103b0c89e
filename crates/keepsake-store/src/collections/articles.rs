use keepsake_model::{Article, ArticleUpdate};

use crate::state::StateKey;
use crate::store::Store;

/// Article operations over [`StateKey::Articles`].
#[derive(Debug, Clone, Copy)]
pub struct ArticlesView<'a> {
    store: &'a Store,
}

impl<'a> ArticlesView<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> Vec<Article> {
        self.store.read(|s| s.articles.clone())
    }

    pub fn get_by_id(&self, id: i64) -> Option<Article> {
        self.store
            .read(|s| s.articles.iter().find(|a| a.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.store.read(|s| s.articles.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an article and notify `articles`.
    pub fn add(&self, article: Article) {
        self.store
            .mutate(StateKey::Articles, |s| s.articles.push(article));
    }

    /// Apply `update` to the article with `id` and stamp `last_edited`.
    ///
    /// Returns false (and notifies nobody) when no article has that id.
    pub fn update(&self, id: i64, update: ArticleUpdate) -> bool {
        self.store.mutate_if(StateKey::Articles, |s| {
            match s.articles.iter_mut().find(|a| a.id == id) {
                Some(article) => {
                    article.apply(update);
                    true
                }
                None => false,
            }
        })
    }
}
