//! Import registry.
//!
//! Every pass that needs an import goes through one `ImportRegistry` per
//! file. `ensure_import` finds the declaration for a module specifier,
//! creating it next to an anchor declaration when missing, and folds
//! duplicate declarations for the same specifier into the first one.
//! Named bindings are kept unique by imported name and sorted.

use indexmap::IndexSet;
use qunitmod_parser::parser::NodeKind;
use qunitmod_parser::query::{insert_statement, remove_statement, statement_position};
use qunitmod_parser::{NodeArena, NodeIndex, NodeList};
use tracing::{debug, trace};

/// Where a new declaration goes relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertPosition {
    Before,
    After,
}

/// Module specifier string of an import declaration.
pub fn import_source(arena: &NodeArena, declaration: NodeIndex) -> Option<&str> {
    let import = arena.get_import_decl(declaration)?;
    arena.string_literal_value(import.module_specifier)
}

/// Top-level import declarations for `specifier`, in source order.
pub fn find_imports(arena: &NodeArena, root: NodeIndex, specifier: &str) -> Vec<NodeIndex> {
    let Some(statements) = arena.statement_list(root) else {
        return Vec::new();
    };
    statements
        .iter()
        .filter(|&statement| import_source(arena, statement) == Some(specifier))
        .collect()
}

/// Imported name of a specifier: `a` for both `{ a }` and `{ a as b }`.
pub fn imported_name(arena: &NodeArena, specifier: NodeIndex) -> Option<&str> {
    let data = arena.get_import_specifier(specifier)?;
    if data.property_name.is_some() {
        arena.identifier_text(data.property_name)
    } else {
        arena.identifier_text(data.name)
    }
}

/// Imported names of a declaration's `{ ... }` clause, in order.
pub fn named_imports(arena: &NodeArena, declaration: NodeIndex) -> Vec<String> {
    arena
        .get_import_decl(declaration)
        .and_then(|import| import.named_bindings.as_ref())
        .map(|named| {
            named
                .iter()
                .filter_map(|specifier| imported_name(arena, specifier))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Local name of a default import: `wait` in `import wait from '...'`.
pub fn default_import_name(arena: &NodeArena, declaration: NodeIndex) -> Option<&str> {
    let import = arena.get_import_decl(declaration)?;
    arena.identifier_text(import.default_binding)
}

fn last_top_level_import(arena: &NodeArena, root: NodeIndex) -> Option<NodeIndex> {
    let statements = arena.statement_list(root)?;
    statements
        .iter()
        .filter(|&statement| arena.is_kind(statement, NodeKind::ImportDeclaration))
        .last()
}

/// Per-file registry of the import declarations the passes manage.
#[derive(Debug, Default)]
pub struct ImportRegistry {
    managed: IndexSet<String>,
    edits: usize,
}

impl ImportRegistry {
    pub fn new() -> ImportRegistry {
        ImportRegistry::default()
    }

    /// Number of import edits made so far.
    pub fn edits(&self) -> usize {
        self.edits
    }

    /// Count an import edit a pass made directly on a declaration.
    pub fn record_edit(&mut self) {
        self.edits += 1;
    }

    /// Find or create the declaration for `specifier`.
    ///
    /// A new declaration is placed before or after the last declaration for
    /// `anchor`; without one it follows the last import, and without any
    /// import it becomes the first statement.
    pub fn ensure_import(
        &mut self,
        arena: &mut NodeArena,
        root: NodeIndex,
        specifier: &str,
        anchor: Option<&str>,
        position: InsertPosition,
    ) -> NodeIndex {
        self.managed.insert(specifier.to_string());

        // Namespace imports cannot also carry a `{ ... }` clause.
        let candidates: Vec<NodeIndex> = find_imports(arena, root, specifier)
            .into_iter()
            .filter(|&declaration| {
                arena
                    .get_import_decl(declaration)
                    .is_some_and(|import| import.namespace_binding.is_none())
            })
            .collect();
        if let Some((&first, rest)) = candidates.split_first() {
            for &duplicate in rest {
                self.fold_into(arena, root, first, duplicate);
            }
            return first;
        }

        let declaration = arena.create_import_declaration(Vec::new(), specifier);
        let anchor_declaration = anchor.and_then(|anchor| find_imports(arena, root, anchor).last().copied());
        let inserted_at = match (anchor_declaration, position) {
            (Some(anchor), InsertPosition::Before) => {
                let at = statement_position(arena, root, anchor).unwrap_or(0);
                // The new declaration takes over the anchor's spacing.
                if arena.has_blank_line_before(anchor) {
                    arena.set_blank_line_before(anchor, false);
                    arena.set_blank_line_before(declaration, true);
                }
                at
            }
            (Some(anchor), InsertPosition::After) => {
                statement_position(arena, root, anchor).map_or(0, |at| at + 1)
            }
            (None, _) => last_top_level_import(arena, root)
                .and_then(|last| statement_position(arena, root, last))
                .map_or(0, |at| at + 1),
        };
        insert_statement(arena, root, inserted_at, declaration);
        self.edits += 1;
        debug!(specifier, ?anchor, at = inserted_at, "created import declaration");
        declaration
    }

    /// Ensure `names` are imported from `specifier`.
    pub fn ensure_specifiers(
        &mut self,
        arena: &mut NodeArena,
        root: NodeIndex,
        specifier: &str,
        names: &[&str],
        anchor: Option<&str>,
        position: InsertPosition,
    ) -> NodeIndex {
        let declaration = self.ensure_import(arena, root, specifier, anchor, position);
        self.merge_specifiers(arena, declaration, names);
        declaration
    }

    /// Add named bindings for `names`, deduplicated and sorted.
    pub fn merge_specifiers(&mut self, arena: &mut NodeArena, declaration: NodeIndex, names: &[&str]) {
        let specifiers = names
            .iter()
            .map(|name| arena.create_import_specifier(name))
            .collect();
        self.adopt_specifiers(arena, declaration, specifiers);
    }

    /// Add existing specifier nodes (keeping any `as` renames). A specifier
    /// whose imported name is already bound is dropped.
    pub fn adopt_specifiers(
        &mut self,
        arena: &mut NodeArena,
        declaration: NodeIndex,
        specifiers: Vec<NodeIndex>,
    ) {
        let Some(import) = arena.get_import_decl(declaration) else {
            return;
        };
        let mut combined: Vec<NodeIndex> = import
            .named_bindings
            .as_ref()
            .map(|named| named.nodes.clone())
            .unwrap_or_default();
        combined.extend(specifiers);
        self.set_specifiers(arena, declaration, combined);
    }

    /// Replace the `{ ... }` clause of a declaration with `specifiers`,
    /// deduplicated and sorted.
    pub fn replace_specifiers(
        &mut self,
        arena: &mut NodeArena,
        declaration: NodeIndex,
        specifiers: Vec<NodeIndex>,
    ) {
        self.set_specifiers(arena, declaration, specifiers);
    }

    fn set_specifiers(&mut self, arena: &mut NodeArena, declaration: NodeIndex, specifiers: Vec<NodeIndex>) {
        let Some(import) = arena.get_import_decl(declaration) else {
            return;
        };
        let had_clause = import.named_bindings.is_some();
        let before = named_imports(arena, declaration);

        let mut merged: Vec<NodeIndex> = Vec::with_capacity(specifiers.len());
        for specifier in specifiers {
            let Some(name) = imported_name(arena, specifier) else {
                continue;
            };
            if !merged
                .iter()
                .any(|&existing| imported_name(arena, existing) == Some(name))
            {
                merged.push(specifier);
            }
        }
        merged.sort_by(|&a, &b| imported_name(arena, a).cmp(&imported_name(arena, b)));

        let after: Vec<&str> = merged
            .iter()
            .filter_map(|&specifier| imported_name(arena, specifier))
            .collect();
        if had_clause && after == before {
            return;
        }
        trace!(?before, ?after, "import specifiers updated");
        if let Some(import) = arena.get_import_decl_mut(declaration) {
            import.named_bindings = Some(NodeList::with_nodes(merged));
        }
        self.edits += 1;
    }

    /// Remove a top-level declaration. Its leading comments and blank-line
    /// spacing move to the statement that follows it.
    pub fn remove_import(&mut self, arena: &mut NodeArena, root: NodeIndex, declaration: NodeIndex) {
        let Some(at) = statement_position(arena, root, declaration) else {
            return;
        };
        let next = arena.statement_list(root).and_then(|list| list.get(at + 1));
        if let Some(next) = next {
            if arena.has_blank_line_before(declaration) {
                arena.set_blank_line_before(next, true);
            }
            let comments = arena.take_comments(declaration);
            arena.add_leading_comments(next, comments.leading);
        }
        remove_statement(arena, root, declaration);
        self.edits += 1;
        debug!(source = ?import_source(arena, declaration), "removed import declaration");
    }

    /// Move the bindings of `duplicate` into `first`, removing `duplicate`
    /// when nothing is left in it.
    fn fold_into(&mut self, arena: &mut NodeArena, root: NodeIndex, first: NodeIndex, duplicate: NodeIndex) {
        let Some(import) = arena.get_import_decl_mut(duplicate) else {
            return;
        };
        let named = import.named_bindings.take().map(|list| list.nodes).unwrap_or_default();
        let default_binding = import.default_binding;
        self.adopt_specifiers(arena, first, named);

        let first_has_default = arena
            .get_import_decl(first)
            .is_some_and(|import| import.default_binding.is_some());
        if default_binding.is_some() && !first_has_default {
            if let Some(import) = arena.get_import_decl_mut(first) {
                import.default_binding = default_binding;
            }
            if let Some(import) = arena.get_import_decl_mut(duplicate) {
                import.default_binding = NodeIndex::NONE;
            }
        }

        let now_empty = arena
            .get_import_decl(duplicate)
            .is_some_and(|import| import.default_binding.is_none());
        if now_empty {
            self.remove_import(arena, root, duplicate);
        } else {
            self.edits += 1;
        }
        debug!(source = ?import_source(arena, first), "folded duplicate import declaration");
    }

    /// Every managed specifier has at most one declaration with a `{ ... }`
    /// clause, and that clause is sorted with no duplicates.
    ///
    /// # Panics
    ///
    /// When a pass left duplicate declarations or unsorted bindings behind.
    pub fn assert_unique(&self, arena: &NodeArena, root: NodeIndex) {
        for specifier in &self.managed {
            let declarations: Vec<NodeIndex> = find_imports(arena, root, specifier)
                .into_iter()
                .filter(|&declaration| {
                    arena
                        .get_import_decl(declaration)
                        .is_some_and(|import| import.named_bindings.is_some())
                })
                .collect();
            assert!(
                declarations.len() <= 1,
                "import registry left {} declarations for '{specifier}'",
                declarations.len()
            );
            for declaration in declarations {
                let names = named_imports(arena, declaration);
                assert!(
                    names.windows(2).all(|pair| pair[0] < pair[1]),
                    "import bindings for '{specifier}' are not sorted and unique: {names:?}"
                );
            }
        }
    }
}
