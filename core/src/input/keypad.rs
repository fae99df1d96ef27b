//! Virtual keypad layout

/// What pressing a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Insert a literal into the active field
    Insert(&'static str),
    /// Delete backwards in the active field
    Backspace,
    /// Empty every field and hide the results
    Clear,
    /// Submit the calculation
    Solve,
}

/// One key of the virtual keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    /// Text printed on the key
    pub label: &'static str,
    pub action: KeyAction,
    /// Alt+<char> shortcut in the terminal
    pub shortcut: Option<char>,
}

impl Key {
    const fn insert(label: &'static str, value: &'static str, shortcut: Option<char>) -> Self {
        Self {
            label,
            action: KeyAction::Insert(value),
            shortcut,
        }
    }

    const fn control(label: &'static str, action: KeyAction) -> Self {
        Self {
            label,
            action,
            shortcut: None,
        }
    }

    /// Literal inserted by this key, if any
    pub fn value(&self) -> Option<&'static str> {
        match self.action {
            KeyAction::Insert(value) => Some(value),
            _ => None,
        }
    }
}

const STANDARD_ROWS: &[&[Key]] = &[
    &[
        Key::insert("sin", "sin(", Some('s')),
        Key::insert("cos", "cos(", Some('c')),
        Key::insert("tan", "tan(", Some('t')),
        Key::insert("ln", "ln(", Some('l')),
        Key::insert("log", "log(", Some('g')),
    ],
    &[
        Key::insert("√", "sqrt(", Some('r')),
        Key::insert("eˣ", "exp(", Some('e')),
        Key::insert("π", "pi", Some('p')),
        Key::insert("xⁿ", "^", Some('n')),
        Key::insert("x", "x", Some('x')),
    ],
    &[
        Key::insert("asin", "asin(", Some('S')),
        Key::insert("acos", "acos(", Some('C')),
        Key::insert("atan", "atan(", Some('T')),
        Key::insert("|x|", "Abs(", Some('a')),
        Key::insert("∞", "oo", Some('i')),
    ],
    &[
        Key::control("⌫", KeyAction::Backspace),
        Key::control("C", KeyAction::Clear),
        Key::control("=", KeyAction::Solve),
    ],
];

/// Keypad laid out in rows
#[derive(Debug, Clone)]
pub struct Keypad {
    rows: Vec<Vec<Key>>,
}

impl Keypad {
    /// The default scientific keypad
    pub fn standard() -> Self {
        Self {
            rows: STANDARD_ROWS.iter().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Key>] {
        &self.rows
    }

    /// Iterate over every key
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flatten()
    }

    /// Key bound to an Alt+`c` shortcut
    pub fn by_shortcut(&self, c: char) -> Option<&Key> {
        self.keys().find(|key| key.shortcut == Some(c))
    }

    /// Key with the given label
    pub fn by_label(&self, label: &str) -> Option<&Key> {
        self.keys().find(|key| key.label == label)
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::standard()
    }
}
