//! Options — the `:set` layer and the display snapshot derived from it.
//!
//! # Supported syntax
//!
//! | Syntax              | Effect                                  |
//! |---------------------|-----------------------------------------|
//! | `:set option`       | Enable boolean / show value             |
//! | `:set nooption`     | Disable boolean                         |
//! | `:set option!`      | Toggle boolean                          |
//! | `:set option?`      | Query current value                     |
//! | `:set option=val`   | Assign                                  |
//! | `:set option+=val`  | Add to a number / append a flag         |
//! | `:set option-=val`  | Subtract from a number / remove a flag  |
//! | `:set`              | Show changed options                    |
//! | `:set all`          | Show all options                        |
//!
//! # Options
//!
//! | Full name     | Abbrev | Type   | Default     |
//! |---------------|--------|--------|-------------|
//! | `tabstop`     | `ts`   | number | 8           |
//! | `list`        | `list` | bool   | false       |
//! | `wrap`        | `wrap` | bool   | true        |
//! | `number`      | `nu`   | bool   | false       |
//! | `columns`     | `co`   | number | 80          |
//! | `virtualedit` | `ve`   | flags  | `""`        |
//! | `selection`   | `sel`  | string | `inclusive` |

use tracing::debug;

use crate::error::OptionError;
use crate::mode::{EditState, Mode, Selection, VirtualEdit};

// ---------------------------------------------------------------------------
// Directives
// ---------------------------------------------------------------------------

/// A parsed `:set` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Query(String),
    Assign(String, String),
    /// `option+=value`
    Add(String, String),
    /// `option-=value`
    Remove(String, String),
    ShowChanged,
    ShowAll,
}

/// Parse the whole argument string of `:set`.
///
/// `:set` with nothing after it yields [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse one whitespace-separated `:set` argument.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }

    if let Some(eq) = arg.find('=') {
        let value = arg[eq + 1..].to_string();
        let head = &arg[..eq];
        if let Some(name) = head.strip_suffix('+') {
            return SetDirective::Add(name.to_string(), value);
        }
        if let Some(name) = head.strip_suffix('-') {
            return SetDirective::Remove(name.to_string(), value);
        }
        return SetDirective::Assign(head.to_string(), value);
    }

    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }

    // `nonumber` → Off("number"), but `number` itself must not become
    // Off("mber").
    if let Some(name) = arg.strip_prefix("no") {
        if lookup(name).is_some_and(|def| def.kind == Kind::Bool) {
            return SetDirective::Off(name.to_string());
        }
    }

    // A bare non-boolean option shows its value.
    if lookup(arg).is_some_and(|def| def.kind != Kind::Bool) {
        return SetDirective::Query(arg.to_string());
    }

    SetDirective::On(arg.to_string())
}

// ---------------------------------------------------------------------------
// Option table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Number,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Name {
    Tabstop,
    List,
    Wrap,
    Number,
    Columns,
    VirtualEdit,
    Selection,
}

#[derive(Debug)]
struct OptionDef {
    full: &'static str,
    abbrev: &'static str,
    kind: Kind,
    name: Name,
}

const OPTIONS: &[OptionDef] = &[
    OptionDef { full: "columns", abbrev: "co", kind: Kind::Number, name: Name::Columns },
    OptionDef { full: "list", abbrev: "list", kind: Kind::Bool, name: Name::List },
    OptionDef { full: "number", abbrev: "nu", kind: Kind::Bool, name: Name::Number },
    OptionDef { full: "selection", abbrev: "sel", kind: Kind::Text, name: Name::Selection },
    OptionDef { full: "tabstop", abbrev: "ts", kind: Kind::Number, name: Name::Tabstop },
    OptionDef { full: "virtualedit", abbrev: "ve", kind: Kind::Text, name: Name::VirtualEdit },
    OptionDef { full: "wrap", abbrev: "wrap", kind: Kind::Bool, name: Name::Wrap },
];

fn lookup(name: &str) -> Option<&'static OptionDef> {
    OPTIONS
        .iter()
        .find(|def| def.full == name || def.abbrev == name)
}

/// Returns `true` if `name` is a known option (full name or abbreviation).
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    lookup(name).is_some()
}

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// Read-only display settings for one call into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Columns per tab stop (at least 1).
    pub tabstop: usize,
    /// Show tabs as `^I` instead of expanding them.
    pub list: bool,
    /// Long lines wrap onto several screen rows.
    pub wrap: bool,
    /// Width of the text area in screen columns; 0 when unknown.
    pub width: usize,
}

impl DisplayConfig {
    /// Default settings with the given tab stop.
    #[must_use]
    pub fn with_tabstop(tabstop: usize) -> Self {
        Self {
            tabstop: tabstop.max(1),
            ..Self::default()
        }
    }

    /// The same settings with list mode turned off.
    #[must_use]
    pub const fn nolist(self) -> Self {
        Self {
            list: false,
            ..self
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tabstop: 8,
            list: false,
            wrap: true,
            width: 80,
        }
    }
}

/// Width of the line-number column for a buffer of `line_count` lines.
///
/// At least three digits plus a separator, like a `numberwidth` of 4.
#[must_use]
pub fn number_width(line_count: usize, show_numbers: bool) -> usize {
    if !show_numbers {
        return 0;
    }
    let digits = line_count.max(1).ilog10() as usize + 1;
    digits.max(3) + 1
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Largest accepted `tabstop`.
pub const MAX_TABSTOP: usize = 9999;
/// Largest accepted `columns`.
pub const MAX_COLUMNS: usize = 10_000;

/// Current option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub tabstop: usize,
    pub list: bool,
    pub wrap: bool,
    pub number: bool,
    pub columns: usize,
    pub virtualedit: VirtualEdit,
    pub selection: Selection,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tabstop: 8,
            list: false,
            wrap: true,
            number: false,
            columns: 80,
            virtualedit: VirtualEdit::empty(),
            selection: Selection::Inclusive,
        }
    }
}

impl Options {
    /// Apply a whole `:set` argument string. Returns the lines to show for
    /// queries, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first directive that fails; earlier ones stay applied.
    pub fn set(&mut self, args: &str) -> Result<Vec<String>, OptionError> {
        let mut shown = Vec::new();
        for directive in parse_set(args) {
            match directive {
                SetDirective::ShowChanged => shown.extend(self.changed()),
                SetDirective::ShowAll => shown.extend(self.all()),
                other => shown.extend(self.apply(&other)?),
            }
        }
        Ok(shown)
    }

    /// Apply one directive. Queries return the formatted value.
    ///
    /// # Errors
    ///
    /// Unknown names, toggling a non-boolean, and malformed values.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::ShowChanged | SetDirective::ShowAll => Ok(None),
            SetDirective::Query(name) => Ok(Some(self.format(find(name)?))),
            SetDirective::On(name) => {
                let def = find(name)?;
                if def.kind == Kind::Bool {
                    self.set_bool(def.name, true);
                    debug!(option = def.full, "option on");
                    Ok(None)
                } else {
                    Ok(Some(self.format(def)))
                }
            }
            SetDirective::Off(name) => {
                let def = bool_def(name)?;
                self.set_bool(def.name, false);
                debug!(option = def.full, "option off");
                Ok(None)
            }
            SetDirective::Toggle(name) => {
                let def = bool_def(name)?;
                let current = self.get_bool(def.name);
                self.set_bool(def.name, !current);
                debug!(option = def.full, value = !current, "option toggled");
                Ok(None)
            }
            SetDirective::Assign(name, value) => {
                self.assign(find(name)?, value, Op::Assign)?;
                Ok(None)
            }
            SetDirective::Add(name, value) => {
                self.assign(find(name)?, value, Op::Add)?;
                Ok(None)
            }
            SetDirective::Remove(name, value) => {
                self.assign(find(name)?, value, Op::Remove)?;
                Ok(None)
            }
        }
    }

    /// The display snapshot for a window showing `line_count` lines.
    #[must_use]
    pub fn display_config(&self, line_count: usize) -> DisplayConfig {
        DisplayConfig {
            tabstop: self.tabstop.max(1),
            list: self.list,
            wrap: self.wrap,
            width: self
                .columns
                .saturating_sub(number_width(line_count, self.number)),
        }
    }

    /// The edit state for `mode` under these options.
    #[must_use]
    pub fn edit_state(&self, mode: Mode) -> EditState {
        EditState::new(mode)
            .with_virtualedit(self.virtualedit)
            .with_selection(self.selection)
    }

    fn get_bool(&self, name: Name) -> bool {
        match name {
            Name::List => self.list,
            Name::Wrap => self.wrap,
            Name::Number => self.number,
            _ => false,
        }
    }

    fn set_bool(&mut self, name: Name, value: bool) {
        match name {
            Name::List => self.list = value,
            Name::Wrap => self.wrap = value,
            Name::Number => self.number = value,
            _ => {}
        }
    }

    fn assign(&mut self, def: &OptionDef, value: &str, op: Op) -> Result<(), OptionError> {
        let invalid = || OptionError::InvalidValue {
            name: def.full.to_string(),
            value: value.to_string(),
        };
        match def.kind {
            Kind::Bool => return Err(invalid()),
            Kind::Number => {
                let n: usize = value.parse().map_err(|_| OptionError::InvalidNumber {
                    name: def.full.to_string(),
                    value: value.to_string(),
                })?;
                let slot = match def.name {
                    Name::Tabstop => &mut self.tabstop,
                    _ => &mut self.columns,
                };
                let next = match op {
                    Op::Assign => n,
                    Op::Add => slot.saturating_add(n),
                    Op::Remove => slot.saturating_sub(n),
                };
                let max = if def.name == Name::Tabstop { MAX_TABSTOP } else { MAX_COLUMNS };
                if next > max || (def.name == Name::Tabstop && next == 0) {
                    return Err(invalid());
                }
                *slot = next;
            }
            Kind::Text => match def.name {
                Name::VirtualEdit => {
                    let flags = VirtualEdit::parse(value).ok_or_else(invalid)?;
                    self.virtualedit = match op {
                        Op::Assign => flags,
                        Op::Add => self.virtualedit | flags,
                        Op::Remove => self.virtualedit - flags,
                    };
                }
                _ => {
                    if op != Op::Assign {
                        return Err(invalid());
                    }
                    self.selection = Selection::parse(value).ok_or_else(invalid)?;
                }
            },
        }
        debug!(option = def.full, value, "option assigned");
        Ok(())
    }

    fn format(&self, def: &OptionDef) -> String {
        match def.name {
            Name::Tabstop => format!("tabstop={}", self.tabstop),
            Name::Columns => format!("columns={}", self.columns),
            Name::VirtualEdit => format!("virtualedit={}", self.virtualedit),
            Name::Selection => format!("selection={}", self.selection),
            Name::List | Name::Wrap | Name::Number => {
                format_bool(def.full, self.get_bool(def.name))
            }
        }
    }

    fn changed(&self) -> Vec<String> {
        let defaults = Self::default();
        OPTIONS
            .iter()
            .filter(|def| self.format(def) != defaults.format(def))
            .map(|def| self.format(def))
            .collect()
    }

    fn all(&self) -> Vec<String> {
        OPTIONS.iter().map(|def| self.format(def)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Assign,
    Add,
    Remove,
}

fn find(name: &str) -> Result<&'static OptionDef, OptionError> {
    lookup(name).ok_or_else(|| OptionError::Unknown(name.to_string()))
}

fn bool_def(name: &str) -> Result<&'static OptionDef, OptionError> {
    let def = find(name)?;
    if def.kind == Kind::Bool {
        Ok(def)
    } else {
        Err(OptionError::NotBoolean(name.to_string()))
    }
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
