use crate::SentimentError;
use log::{debug, warn};
use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufRead, BufReader},
    iter::FromIterator,
    path::Path,
};

/// An immutable word list, one normalized word per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SentimentError> {
        let path = path.as_ref();
        let load_error = |source| SentimentError::LexiconLoad {
            path: path.to_owned(),
            source,
        };

        let file = File::open(path).map_err(load_error)?;
        let lexicon = Self::from_reader(BufReader::new(file)).map_err(load_error)?;

        if lexicon.is_empty() {
            warn!("lexicon {} is empty", path.display());
        }
        debug!("loaded {} words from {}", lexicon.len(), path.display());
        Ok(lexicon)
    }

    /// Reads one word per line. Blank lines are ignored.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.insert(word.to_lowercase());
            }
        }
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Lexicon {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }
}

/// The positive and negative vocabularies of a run.
#[derive(Debug, Clone)]
pub struct Lexicons {
    pub positive: Lexicon,
    pub negative: Lexicon,
}

impl Lexicons {
    pub fn load(
        positive: impl AsRef<Path>,
        negative: impl AsRef<Path>,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            positive: Lexicon::load(positive)?,
            negative: Lexicon::load(negative)?,
        })
    }
}
