//! Keywords of the cythonic language and the trie used to recognize them.
//!
//! Every keyword is spelled with the 26 ASCII letters only, and matching is case-insensitive.
//! The trie is built once per process from [`Keyword`]'s variants and shared by every lexer.

use std::fmt::{Display, Formatter};
use std::sync::LazyLock;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// The category a keyword belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum KeywordCategory {
    /// Words like `print` or `var`, that are only meaningful in certain positions
    Contextual,
    /// `bool`, `char`, `double`, `int`, `str` and `void`
    Type,
    /// `true` and `false`
    BooleanLiteral,
    /// Optional filler words (`at`, `its`, `then`)
    Noise,
    /// Words that introduce or steer control flow
    Control,
    /// Words reserved for declarations and access control
    Structural,
}

/// A keyword
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Keyword {
    // contextual
    And,
    Args,
    Async,
    Dyn,
    Get,
    Global,
    Init,
    Input,
    Let,
    Nmof,
    Nnull,
    Or,
    Print,
    Rec,
    Req,
    Set,
    Stc,
    This,
    Val,
    Var,

    // types
    Bool,
    Char,
    Double,
    Int,
    Str,
    Void,

    // boolean literals
    True,
    False,

    // noise
    At,
    Its,
    Then,

    // control
    Break,
    Case,
    Default,
    Do,
    Else,
    For,
    Foreach,
    If,
    In,
    Next,
    Return,
    Switch,
    While,

    // structural
    As,
    Base,
    Class,
    Const,
    Enum,
    Iface,
    New,
    Nspace,
    Null,
    Priv,
    Prot,
    Pub,
    Rdo,
    Record,
    Struct,
    Use,
}

impl Keyword {
    /// The lowercase spelling of this keyword
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Gets the category of this keyword
    pub fn category(&self) -> KeywordCategory {
        use Keyword::*;
        match self {
            And | Args | Async | Dyn | Get | Global | Init | Input | Let | Nmof | Nnull | Or
            | Print | Rec | Req | Set | Stc | This | Val | Var => KeywordCategory::Contextual,
            Bool | Char | Double | Int | Str | Void => KeywordCategory::Type,
            True | False => KeywordCategory::BooleanLiteral,
            At | Its | Then => KeywordCategory::Noise,
            Break | Case | Default | Do | Else | For | Foreach | If | In | Next | Return
            | Switch | While => KeywordCategory::Control,
            As | Base | Class | Const | Enum | Iface | New | Nspace | Null | Priv | Prot | Pub
            | Rdo | Record | Struct | Use => KeywordCategory::Structural,
        }
    }

    /// Whether this keyword names a type
    pub fn is_type(&self) -> bool {
        self.category() == KeywordCategory::Type
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALPHABET: usize = 26;

/// A state in the trie
#[derive(Debug, Clone, Default)]
struct State {
    edges: [Option<usize>; ALPHABET],
    accepts: Option<Keyword>,
}

/// A deterministic automaton over the letters `a..=z` that accepts exactly the keywords.
#[derive(Debug, Clone)]
pub struct KeywordTrie {
    states: Vec<State>,
}

static KEYWORD_TRIE: LazyLock<KeywordTrie> = LazyLock::new(|| {
    Keyword::iter().fold(KeywordTrie::empty(), |mut trie, keyword| {
        trie.insert(keyword.as_str(), keyword);
        trie
    })
});

impl KeywordTrie {
    /// The state every traversal starts in
    pub const ROOT: usize = 0;

    /// Creates a trie that accepts nothing
    pub fn empty() -> Self {
        Self {
            states: vec![State::default()],
        }
    }

    /// The process-wide trie containing every [`Keyword`]
    pub fn global() -> &'static KeywordTrie {
        &KEYWORD_TRIE
    }

    /// Adds a word to this trie. Non-letter characters are skipped.
    pub fn insert(&mut self, word: &str, keyword: Keyword) {
        let mut state = Self::ROOT;
        for index in word.chars().filter_map(letter_index) {
            state = match self.states[state].edges[index] {
                Some(next) => next,
                None => {
                    let next = self.states.len();
                    self.states.push(State::default());
                    self.states[state].edges[index] = Some(next);
                    next
                }
            };
        }
        self.states[state].accepts = Some(keyword);
    }

    /// Follows the edge for `c` out of `state`, lowercasing it first.
    ///
    /// Returns `None` when there is no such edge or `c` is not an ASCII letter.
    pub fn step(&self, state: usize, c: char) -> Option<usize> {
        let index = letter_index(c)?;
        self.states.get(state)?.edges[index]
    }

    /// The keyword accepted in `state`, if any
    pub fn accepting(&self, state: usize) -> Option<Keyword> {
        self.states.get(state)?.accepts
    }

    /// Classifies a whole word. Only succeeds if the entire word is consumed and the traversal
    /// ends on an accepting state.
    pub fn classify(&self, word: &str) -> Option<Keyword> {
        let state = word
            .chars()
            .try_fold(Self::ROOT, |state, c| self.step(state, c))?;
        self.accepting(state)
    }

    /// The number of states in this trie
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.len() == 1
    }
}

/// Classifies a word with the global keyword trie
pub fn classify(word: &str) -> Option<Keyword> {
    KeywordTrie::global().classify(word)
}

fn letter_index(c: char) -> Option<usize> {
    let c = c.to_ascii_lowercase();
    c.is_ascii_lowercase().then(|| (c as u8 - b'a') as usize)
}
