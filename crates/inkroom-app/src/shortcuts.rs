//! Keyboard shortcut registry and documentation.

use inkroom_core::input::Modifiers;
use inkroom_core::tools::ToolKind;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    Clear,
    /// Abort the in-progress gesture.
    Cancel,
    SelectTool(ToolKind),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Check whether a key press triggers this shortcut.
    /// Cmd counts as Ctrl; letter keys match case-insensitively.
    pub fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == modifiers.command()
            && self.shift == modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
            Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Delete", true, false, ShortcutAction::Clear, "Clear the board"),
            Shortcut::new("Escape", false, false, ShortcutAction::Cancel, "Cancel current gesture"),
            Shortcut::new("P", false, false, ShortcutAction::SelectTool(ToolKind::Pen), "Pen"),
            Shortcut::new("E", false, false, ShortcutAction::SelectTool(ToolKind::Eraser), "Eraser"),
            Shortcut::new("R", false, false, ShortcutAction::SelectTool(ToolKind::Rectangle), "Rectangle"),
            Shortcut::new("C", false, false, ShortcutAction::SelectTool(ToolKind::Circle), "Circle"),
            Shortcut::new("L", false, false, ShortcutAction::SelectTool(ToolKind::Line), "Line"),
            Shortcut::new("T", false, false, ShortcutAction::SelectTool(ToolKind::Text), "Text"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, modifiers))
            .map(|shortcut| shortcut.action)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo");
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
    }

    #[test]
    fn test_resolve_undo_redo() {
        assert_eq!(ShortcutRegistry::resolve("z", ctrl()), Some(ShortcutAction::Undo));
        let ctrl_shift = Modifiers {
            shift: true,
            ..ctrl()
        };
        assert_eq!(ShortcutRegistry::resolve("Z", ctrl_shift), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutRegistry::resolve("y", ctrl()), Some(ShortcutAction::Redo));
    }

    #[test]
    fn test_meta_counts_as_ctrl() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert_eq!(ShortcutRegistry::resolve("z", meta), Some(ShortcutAction::Undo));
    }

    #[test]
    fn test_tool_keys_need_no_modifier() {
        assert_eq!(
            ShortcutRegistry::resolve("r", Modifiers::default()),
            Some(ShortcutAction::SelectTool(ToolKind::Rectangle))
        );
        assert_eq!(ShortcutRegistry::resolve("r", ctrl()), None);
        assert_eq!(ShortcutRegistry::resolve("q", Modifiers::default()), None);
    }

    #[test]
    fn test_every_tool_has_a_shortcut() {
        let shortcuts = ShortcutRegistry::all();
        for tool in ToolKind::all() {
            assert!(
                shortcuts
                    .iter()
                    .any(|s| s.action == ShortcutAction::SelectTool(*tool)),
                "no shortcut for {}",
                tool.display_name()
            );
        }
    }
}
