//! Interactive project menu for aliases and the default project.
//!
//! The menu edits a [`ProjectStore`] in memory. The caller saves it only when
//! the user picks "Save and quit"; Esc on the project list discards changes.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use console::{Key, Term, style};
use dialoguer::Input;
use toggl_core::{ProjectStore, StoreError};

const PROJECT_LIST_TITLE: &str =
    "Select a Project (Enter or shortcut to pick, q to save and quit, Esc to quit without saving)";
const SAVE_KEY: char = 'q';
const SAVE_AND_QUIT: &str = "Save and quit";

/// One row of a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Selectable row, picked with Enter or its shortcut key.
    Item { key: Option<char>, label: String },
    /// Blank spacer row.
    Separator,
}

impl MenuEntry {
    pub fn item(key: Option<char>, label: impl Into<String>) -> Self {
        Self::Item {
            key,
            label: label.into(),
        }
    }

    pub const fn is_selectable(&self) -> bool {
        matches!(self, Self::Item { .. })
    }

    fn has_key(&self, pressed: char) -> bool {
        matches!(self, Self::Item { key: Some(key), .. } if *key == pressed)
    }
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item {
                key: Some(key),
                label,
            } => write!(f, "[{key}] {label}"),
            Self::Item { key: None, label } => f.write_str(label),
            Self::Separator => Ok(()),
        }
    }
}

/// Terminal interaction used by the menu.
pub trait Prompt {
    /// Shows a list and returns the chosen index, or `None` on Esc.
    fn select(&mut self, title: &str, entries: &[MenuEntry]) -> Result<Option<usize>>;

    /// Reads a line of text; an empty answer is allowed.
    fn input(&mut self, prompt: &str) -> Result<String>;
}

/// What a single key press does on a selection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Move(usize),
    Pick(usize),
    Cancel,
    Ignore,
}

fn handle_key(key: &Key, cursor: usize, entries: &[MenuEntry]) -> KeyOutcome {
    match key {
        Key::Escape | Key::CtrlC => KeyOutcome::Cancel,
        Key::Enter => KeyOutcome::Pick(cursor),
        Key::ArrowUp => step(cursor, entries, false).map_or(KeyOutcome::Ignore, KeyOutcome::Move),
        Key::ArrowDown => step(cursor, entries, true).map_or(KeyOutcome::Ignore, KeyOutcome::Move),
        Key::Char(pressed) => entries
            .iter()
            .position(|entry| entry.has_key(*pressed))
            .map_or(KeyOutcome::Ignore, KeyOutcome::Pick),
        _ => KeyOutcome::Ignore,
    }
}

/// Next selectable row from `cursor`, wrapping around and skipping separators.
fn step(cursor: usize, entries: &[MenuEntry], forward: bool) -> Option<usize> {
    let len = entries.len();
    (1..len)
        .map(|offset| {
            if forward {
                (cursor + offset) % len
            } else {
                (cursor + len - offset) % len
            }
        })
        .find(|&i| entries[i].is_selectable())
}

/// Moves through `entries` on key presses until a row is picked or the list
/// is cancelled.
///
/// `next_key` gets the cursor position before each key is read, so it can
/// draw the list first.
pub fn choose<F>(entries: &[MenuEntry], mut next_key: F) -> Result<Option<usize>>
where
    F: FnMut(usize) -> Result<Key>,
{
    let Some(mut cursor) = entries.iter().position(MenuEntry::is_selectable) else {
        return Ok(None);
    };
    loop {
        match handle_key(&next_key(cursor)?, cursor, entries) {
            KeyOutcome::Move(next) => cursor = next,
            KeyOutcome::Pick(index) => return Ok(Some(index)),
            KeyOutcome::Cancel => return Ok(None),
            KeyOutcome::Ignore => {}
        }
    }
}

/// [`Prompt`] on the controlling terminal.
///
/// Lists are drawn with `console` and read key by key so shortcuts work;
/// text input goes through `dialoguer`.
#[derive(Debug)]
pub struct TerminalPrompt {
    term: Term,
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Prompt for TerminalPrompt {
    fn select(&mut self, title: &str, entries: &[MenuEntry]) -> Result<Option<usize>> {
        let term = &self.term;
        term.hide_cursor()?;
        term.write_line(&style(title).bold().to_string())?;

        let choice = choose(entries, |cursor| {
            for (i, entry) in entries.iter().enumerate() {
                if i == cursor {
                    term.write_line(&style(format!("> {entry}")).cyan().to_string())?;
                } else {
                    term.write_line(&format!("  {entry}"))?;
                }
            }
            let key = term.read_key()?;
            term.clear_last_lines(entries.len())?;
            Ok(key)
        });

        term.clear_last_lines(1)?;
        term.show_cursor()?;
        choice
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    }
}

/// How the menu was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    Saved,
    Discarded,
}

/// Actions offered for a single project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    ChangeAlias,
    RemoveAlias,
    SetDefault,
    Back,
}

impl EditAction {
    pub const fn key(self) -> char {
        match self {
            Self::ChangeAlias => 'a',
            Self::RemoveAlias => 'r',
            Self::SetDefault => 'd',
            Self::Back => 'b',
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ChangeAlias => "Change Alias",
            Self::RemoveAlias => "Remove Alias",
            Self::SetDefault => "Set as default project",
            Self::Back => "Back to project list",
        }
    }

    pub fn entry(self) -> MenuEntry {
        MenuEntry::item(Some(self.key()), self.label())
    }
}

/// Shortcut label for a project row: `0-9`, then `a-p` and `r-z`.
///
/// `q` is skipped because it is the quit key. Rows past `z` get no shortcut.
pub fn shortcut_for_index(index: usize) -> Option<char> {
    if index < 10 {
        return char::from_digit(u32::try_from(index).ok()?, 10);
    }
    let mut offset = index - 10;
    if offset >= usize::from(b'q' - b'a') {
        offset += 1;
    }
    if offset > usize::from(b'z' - b'a') {
        return None;
    }
    Some(char::from(b'a' + u8::try_from(offset).ok()?))
}

/// Project list state: the store being edited and the display order.
#[derive(Debug)]
pub struct ProjectMenu {
    store: ProjectStore,
    order: Vec<u64>,
}

impl ProjectMenu {
    pub fn new(store: ProjectStore, default_client: Option<&str>) -> Self {
        let order = store.sorted(default_client).iter().map(|p| p.id).collect();
        Self { store, order }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Row label: default marker and the project itself.
    pub fn project_label(&self, index: usize) -> String {
        let id = self.order[index];
        let marker = if self.store.default_project_id == Some(id) {
            "[DEFAULT] "
        } else {
            ""
        };
        let project = self
            .store
            .projects
            .get(&id)
            .map(ToString::to_string)
            .unwrap_or_default();
        format!("{marker}{project}")
    }

    /// Project rows with their shortcuts, a spacer and the save entry.
    pub fn project_entries(&self) -> Vec<MenuEntry> {
        let mut entries: Vec<MenuEntry> = (0..self.order.len())
            .map(|i| MenuEntry::item(shortcut_for_index(i), self.project_label(i)))
            .collect();
        entries.push(MenuEntry::Separator);
        entries.push(MenuEntry::item(Some(SAVE_KEY), SAVE_AND_QUIT));
        entries
    }

    /// Actions that apply to the project at `index`.
    pub fn actions(&self, index: usize) -> Vec<EditAction> {
        let id = self.order[index];
        let mut actions = vec![EditAction::ChangeAlias];
        if self
            .store
            .projects
            .get(&id)
            .is_some_and(|p| p.alias.is_some())
        {
            actions.push(EditAction::RemoveAlias);
        }
        if self.store.default_project_id != Some(id) {
            actions.push(EditAction::SetDefault);
        }
        actions.push(EditAction::Back);
        actions
    }

    /// Runs the menu until the user saves or leaves.
    pub fn run<P: Prompt, W: Write>(&mut self, prompt: &mut P, out: &mut W) -> Result<MenuOutcome> {
        loop {
            let entries = self.project_entries();
            match prompt.select(PROJECT_LIST_TITLE, &entries)? {
                None => return Ok(MenuOutcome::Discarded),
                Some(i) if i < self.order.len() => self.edit(i, prompt, out)?,
                Some(_) => return Ok(MenuOutcome::Saved),
            }
        }
    }

    fn edit<P: Prompt, W: Write>(&mut self, index: usize, prompt: &mut P, out: &mut W) -> Result<()> {
        let actions = self.actions(index);
        let entries: Vec<MenuEntry> = actions.iter().map(|a| a.entry()).collect();
        let action = prompt
            .select(&self.project_label(index), &entries)?
            .and_then(|i| actions.get(i).copied())
            .unwrap_or(EditAction::Back);

        let id = self.order[index];
        let display = self
            .store
            .projects
            .get(&id)
            .map(ToString::to_string)
            .unwrap_or_default();

        match action {
            EditAction::ChangeAlias => {
                let alias =
                    prompt.input(&format!("Enter new alias for '{display}' (blank to cancel)"))?;
                match self.store.set_alias(id, &alias) {
                    Ok(true) => writeln!(out, "Alias set to '{}'.", alias.trim())?,
                    Ok(false) => writeln!(out, "Alias not changed.")?,
                    Err(err @ StoreError::AliasInUse { .. }) => {
                        writeln!(out, "Error: {err}. Alias not changed.")?;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            EditAction::RemoveAlias => {
                self.store.remove_alias(id)?;
                writeln!(out, "Alias removed for '{display}'.")?;
            }
            EditAction::SetDefault => {
                self.store.set_default(id)?;
                let name = self.store.projects.get(&id).map_or("", |p| p.name.as_str());
                writeln!(out, "'{name}' is now the default project.")?;
            }
            EditAction::Back => {}
        }
        Ok(())
    }
}
