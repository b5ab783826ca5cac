use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ExtractionError;

/// Universal part-of-speech tags as emitted by spaCy-style parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartOfSpeech {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Space,
    Sym,
    Verb,
    X,
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Space => "SPACE",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::X => "X",
        }
    }
}

impl FromStr for PartOfSpeech {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.to_ascii_uppercase().as_str() {
            "ADJ" => Self::Adj,
            "ADP" => Self::Adp,
            "ADV" => Self::Adv,
            "AUX" => Self::Aux,
            "CCONJ" | "CONJ" => Self::Cconj,
            "DET" => Self::Det,
            "INTJ" => Self::Intj,
            "NOUN" => Self::Noun,
            "NUM" => Self::Num,
            "PART" => Self::Part,
            "PRON" => Self::Pron,
            "PROPN" => Self::Propn,
            "PUNCT" => Self::Punct,
            "SCONJ" => Self::Sconj,
            "SPACE" => Self::Space,
            "SYM" => Self::Sym,
            "VERB" => Self::Verb,
            "X" => Self::X,
            _ => return Err(s.to_string()),
        };
        Ok(tag)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syntactic relation of a token to its head.
///
/// Only the labels the extractor cares about get their own variant; every other
/// label the parser produces is carried through as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyRelation {
    Nsubj,
    NsubjPass,
    Root,
    Amod,
    Advmod,
    Acomp,
    Dobj,
    Det,
    Prep,
    Pobj,
    Punct,
    Aux,
    Other(String),
}

impl DependencyRelation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Nsubj => "nsubj",
            Self::NsubjPass => "nsubjpass",
            Self::Root => "ROOT",
            Self::Amod => "amod",
            Self::Advmod => "advmod",
            Self::Acomp => "acomp",
            Self::Dobj => "dobj",
            Self::Det => "det",
            Self::Prep => "prep",
            Self::Pobj => "pobj",
            Self::Punct => "punct",
            Self::Aux => "aux",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for DependencyRelation {
    fn from(label: &str) -> Self {
        match label {
            "nsubj" => Self::Nsubj,
            "nsubjpass" => Self::NsubjPass,
            "ROOT" | "root" => Self::Root,
            "amod" => Self::Amod,
            "advmod" => Self::Advmod,
            "acomp" => Self::Acomp,
            "dobj" => Self::Dobj,
            "det" => Self::Det,
            "prep" => Self::Prep,
            "pobj" => Self::Pobj,
            "punct" => Self::Punct,
            "aux" => Self::Aux,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DependencyRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token as delivered by the external parser, before validation.
///
/// `pos`, `dep` and `children` are optional on the wire so that a parser which
/// failed to annotate a token is reported instead of silently producing an
/// empty extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub text: String,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub dep: Option<String>,
    pub head: usize,
    #[serde(default)]
    pub children: Option<Vec<usize>>,
}

impl TokenRecord {
    pub fn new(
        text: impl Into<String>,
        pos: impl Into<String>,
        dep: impl Into<String>,
        head: usize,
        children: Vec<usize>,
    ) -> Self {
        Self {
            text: text.into(),
            pos: Some(pos.into()),
            dep: Some(dep.into()),
            head,
            children: Some(children),
        }
    }
}

/// An immutable, fully annotated dependency token.
///
/// `head` and `children` are indices into the owning [`Sentence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyToken {
    pub text: String,
    pub pos: PartOfSpeech,
    pub dep: DependencyRelation,
    pub head: usize,
    pub children: Vec<usize>,
}

impl DependencyToken {
    pub fn new(
        text: impl Into<String>,
        pos: PartOfSpeech,
        dep: DependencyRelation,
        head: usize,
        children: Vec<usize>,
    ) -> Self {
        Self {
            text: text.into(),
            pos,
            dep,
            head,
            children,
        }
    }

    fn from_record(index: usize, record: TokenRecord) -> Result<Self, ExtractionError> {
        let missing = |field| ExtractionError::MissingField {
            index,
            text: record.text.clone(),
            field,
        };
        let pos = record.pos.as_deref().ok_or_else(|| missing("pos"))?;
        let dep = record.dep.as_deref().ok_or_else(|| missing("dep"))?;
        let children = record.children.clone().ok_or_else(|| missing("children"))?;

        let pos = pos.parse::<PartOfSpeech>().map_err(|value| ExtractionError::InvalidField {
            index,
            field: "pos",
            value,
        })?;
        if dep.is_empty() {
            return Err(ExtractionError::InvalidField {
                index,
                field: "dep",
                value: String::new(),
            });
        }

        Ok(Self {
            pos,
            dep: DependencyRelation::from(dep),
            head: record.head,
            children,
            text: record.text,
        })
    }
}

/// One parsed sentence: an ordered token sequence whose head/child
/// relations stay within the sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<DependencyToken>,
}

impl Sentence {
    /// Builds a sentence, checking the tree-local invariants.
    pub fn new(tokens: Vec<DependencyToken>) -> Result<Self, ExtractionError> {
        let len = tokens.len();
        for (index, token) in tokens.iter().enumerate() {
            if token.head >= len {
                return Err(ExtractionError::OutOfSentence { index, target: token.head, len });
            }
            let is_root = token.dep == DependencyRelation::Root;
            if token.head == index && !is_root {
                return Err(ExtractionError::InvalidTree {
                    index,
                    reason: format!("only the root may be its own head, relation is '{}'", token.dep),
                });
            }
            if is_root && token.head != index {
                return Err(ExtractionError::InvalidTree {
                    index,
                    reason: format!("root token must be its own head, found head {}", token.head),
                });
            }
        }

        // Heads are known to be in range, so children can be checked against them
        for (index, token) in tokens.iter().enumerate() {
            let mut seen = HashSet::new();
            for &child in &token.children {
                if child >= len {
                    return Err(ExtractionError::OutOfSentence { index, target: child, len });
                }
                if child == index {
                    return Err(ExtractionError::InvalidTree {
                        index,
                        reason: "token lists itself as a child".to_string(),
                    });
                }
                if !seen.insert(child) {
                    return Err(ExtractionError::InvalidTree {
                        index,
                        reason: format!("child {} is listed more than once", child),
                    });
                }
                if tokens[child].head != index {
                    return Err(ExtractionError::InvalidTree {
                        index,
                        reason: format!(
                            "child {} ('{}') has head {}",
                            child, tokens[child].text, tokens[child].head
                        ),
                    });
                }
            }
        }
        Ok(Self { tokens })
    }

    /// Converts raw parser records, reporting the first token that lacks a
    /// required annotation.
    pub fn from_records(records: Vec<TokenRecord>) -> Result<Self, ExtractionError> {
        let tokens = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| DependencyToken::from_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(tokens)
    }

    pub fn tokens(&self) -> &[DependencyToken] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&DependencyToken> {
        self.tokens.get(index)
    }

    pub fn head_of(&self, index: usize) -> Option<&DependencyToken> {
        self.token(index).and_then(|token| self.tokens.get(token.head))
    }

    /// Children of a token, in the order the parser listed them
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &DependencyToken> + '_ {
        self.token(index)
            .map(|token| token.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |&child| self.tokens.get(child))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surface text with tokens joined by single spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
