use crate::{Encoding, Error, FieldKind, Result};
use std::{
    fmt::{self, Debug},
    ops::{BitOr, BitOrAssign},
};

/// Set of field options declared in a tag, also used for the flags cached on columns.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options(u32);

impl Options {
    pub const AUTO_INCREMENT: Options = Options(1 << 0);
    pub const AUTO_NOW: Options = Options(1 << 1);
    pub const AUTO_NOW_ADD: Options = Options(1 << 2);
    pub const COLLAPSE: Options = Options(1 << 3);
    pub const FOREIGN_KEY: Options = Options(1 << 4);
    pub const GOB: Options = Options(1 << 5);
    pub const INLINE: Options = Options(1 << 6);
    pub const INLINE_STATIC: Options = Options(1 << 7);
    pub const JSON: Options = Options(1 << 8);
    pub const MANY_TO_MANY: Options = Options(1 << 9);
    pub const MANY_TO_ONE: Options = Options(1 << 10);
    pub const ONE_TO_MANY: Options = Options(1 << 11);
    pub const ONE_TO_ONE: Options = Options(1 << 12);
    pub const PRIMARY_KEY: Options = Options(1 << 13);
    pub const VERSION: Options = Options(1 << 14);
    pub const XML: Options = Options(1 << 15);
    pub const UNIQUE: Options = Options(1 << 16);
    pub const SIZE: Options = Options(1 << 17);
    /// Many relation stored in a map keyed by the remote primary key.
    pub const MAP: Options = Options(1 << 18);
    // Column flags, never declared in tags.
    pub const NULLABLE: Options = Options(1 << 24);
    pub const MANY: Options = Options(1 << 25);
    pub const ONE: Options = Options(1 << 26);

    pub const fn empty() -> Self {
        Options(0)
    }

    pub const fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Options) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Options) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Options) {
        self.0 &= !other.0;
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn is_auto(self) -> bool {
        self.intersects(Options(
            Self::AUTO_INCREMENT.0 | Self::AUTO_NOW.0 | Self::AUTO_NOW_ADD.0 | Self::VERSION.0,
        ))
    }

    pub const fn is_inline(self) -> bool {
        self.intersects(Options(Self::INLINE.0 | Self::INLINE_STATIC.0))
    }

    pub const fn is_many(self) -> bool {
        self.intersects(Options(Self::MANY_TO_MANY.0 | Self::ONE_TO_MANY.0))
    }

    pub const fn is_one(self) -> bool {
        self.intersects(Options(
            Self::FOREIGN_KEY.0 | Self::MANY_TO_ONE.0 | Self::ONE_TO_ONE.0,
        ))
    }

    pub fn encoding(self) -> Option<Encoding> {
        if self.contains(Self::GOB) {
            Some(Encoding::Gob)
        } else if self.contains(Self::JSON) {
            Some(Encoding::Json)
        } else if self.contains(Self::XML) {
            Some(Encoding::Xml)
        } else {
            None
        }
    }

    /// Tag name of a single option.
    pub fn name(self) -> &'static str {
        VOCABULARY
            .iter()
            .find(|v| v.option == self)
            .map_or("?", |v| v.name)
    }
}

impl BitOr for Options {
    type Output = Options;
    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

impl Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for v in VOCABULARY {
            if self.contains(v.option) {
                set.entry(&v.name);
            }
        }
        for (option, name) in [
            (Options::MAP, "map"),
            (Options::NULLABLE, "nullable"),
            (Options::MANY, "many"),
            (Options::ONE, "one"),
        ] {
            if self.contains(option) {
                set.entry(&name);
            }
        }
        set.finish()
    }
}

/// Options that cannot be combined with another of the same class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Class {
    Auto,
    Collapse,
    Relation,
    Encoding,
    Inline,
    PrimaryKey,
    Unique,
    Size,
}

/// Field shape an option requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wants {
    Any,
    Integer,
    Time,
    Text,
    Record,
    Records,
}

struct Entry {
    name: &'static str,
    option: Options,
    class: Class,
    wants: Wants,
}

const fn entry(name: &'static str, option: Options, class: Class, wants: Wants) -> Entry {
    Entry {
        name,
        option,
        class,
        wants,
    }
}

const VOCABULARY: &[Entry] = &[
    entry("auto_increment", Options::AUTO_INCREMENT, Class::Auto, Wants::Integer),
    entry("auto_now", Options::AUTO_NOW, Class::Auto, Wants::Time),
    entry("auto_now_add", Options::AUTO_NOW_ADD, Class::Auto, Wants::Time),
    entry("collapse", Options::COLLAPSE, Class::Collapse, Wants::Any),
    entry("foreign_key", Options::FOREIGN_KEY, Class::Relation, Wants::Record),
    entry("gob", Options::GOB, Class::Encoding, Wants::Any),
    entry("inline", Options::INLINE, Class::Inline, Wants::Record),
    entry("inline_static", Options::INLINE_STATIC, Class::Inline, Wants::Record),
    entry("json", Options::JSON, Class::Encoding, Wants::Any),
    entry("many_to_many", Options::MANY_TO_MANY, Class::Relation, Wants::Records),
    entry("many_to_one", Options::MANY_TO_ONE, Class::Relation, Wants::Record),
    entry("one_to_many", Options::ONE_TO_MANY, Class::Relation, Wants::Records),
    entry("one_to_one", Options::ONE_TO_ONE, Class::Relation, Wants::Record),
    entry("primary_key", Options::PRIMARY_KEY, Class::PrimaryKey, Wants::Any),
    entry("version", Options::VERSION, Class::Auto, Wants::Integer),
    entry("xml", Options::XML, Class::Encoding, Wants::Any),
    entry("unique", Options::UNIQUE, Class::Unique, Wants::Any),
    entry("size", Options::SIZE, Class::Size, Wants::Text),
];

impl Wants {
    fn accepts(self, kind: &FieldKind) -> bool {
        match (self, kind) {
            (Wants::Any, _) => true,
            (Wants::Integer, FieldKind::Scalar { prototype, .. }) => prototype().is_integer(),
            (Wants::Time, FieldKind::Scalar { prototype, .. }) => prototype().is_time(),
            (Wants::Text, FieldKind::Scalar { prototype, .. }) => {
                matches!(prototype(), crate::Value::Varchar(..))
            }
            (Wants::Text, FieldKind::Encoded { .. }) => true,
            (Wants::Record, FieldKind::Record { .. }) => true,
            (Wants::Records, FieldKind::Many { .. }) => true,
            _ => false,
        }
    }
}

/// Result of parsing a field tag.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    /// Name given before the first comma, empty when not declared.
    pub alias: String,
    pub options: Options,
    /// Declared maximum length (`size=N`), 0 when not declared.
    pub size: u32,
}

/// Parses a tag like `"name,primary_key,auto_increment"` for a field of the given kind.
///
/// The first item is the alias, the others are options. Each option belongs to a class
/// and at most one option per class is accepted. Inline fields accept no other option,
/// many relations accept neither other options nor an alias.
pub fn parse_options(kind: &FieldKind, tag: &str) -> Result<Tag> {
    let mut result = Tag::default();
    if let FieldKind::Many { key: Some(..), .. } = kind {
        result.options.insert(Options::MAP);
    }
    if tag.is_empty() {
        return Ok(result);
    }
    let mut classes: Vec<(Class, &str)> = Vec::with_capacity(4);
    for (i, item) in tag.split(',').enumerate() {
        if i == 0 {
            result.alias = item.to_string();
            continue;
        }
        let (name, argument) = match item.split_once('=') {
            Some((name, argument)) => (name, Some(argument)),
            None => (item, None),
        };
        let Some(entry) = VOCABULARY.iter().find(|v| v.name == name) else {
            return Err(Error::msg(format!("unsupported option: {item}")));
        };
        if result.options.contains(entry.option) {
            return Err(Error::msg(format!("duplicate option {name}")));
        }
        match (entry.option == Options::SIZE, argument) {
            (true, Some(argument)) => {
                result.size = argument
                    .parse()
                    .ok()
                    .filter(|v| *v > 0)
                    .ok_or_else(|| Error::msg(format!("invalid option {item}")))?;
            }
            (false, None) => {}
            _ => return Err(Error::msg(format!("unsupported option: {item}"))),
        }
        if !entry.wants.accepts(kind) {
            return Err(Error::msg(format!("type mismatch option {name}")));
        }
        if let Some((_, other)) = classes.iter().find(|(c, _)| *c == entry.class) {
            return Err(Error::msg(format!(
                "option {other} conflict with option {name}"
            )));
        }
        result.options.insert(entry.option);
        classes.push((entry.class, entry.name));
    }
    if let Some((_, inline)) = classes.iter().find(|(c, _)| *c == Class::Inline)
        && classes.len() > 1
    {
        return Err(Error::msg(format!("option {inline} conflict with others")));
    }
    if result.options.is_many() && (classes.len() > 1 || !result.alias.is_empty()) {
        let relation = classes
            .iter()
            .find(|(c, _)| *c == Class::Relation)
            .map_or("", |v| v.1);
        return Err(Error::msg(format!("option {relation} conflict with others")));
    }
    Ok(result)
}
