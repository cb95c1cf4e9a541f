use super::Printer;
use super::expressions::{PREC_ASSIGNMENT, PREC_COMMA, PREC_PRIMARY};
use qunitmod_parser::parser::node::{
    ExportDeclData, ForData, ForInOfData, FunctionFlavor, IfStatementData, ImportDeclData,
    NodeData, TryData, VariableData,
};
use qunitmod_parser::parser::{NodeIndex, NodeKind, NodeList};

impl<'a> Printer<'a> {
    // =========================================================================
    // Source file and statement lists
    // =========================================================================

    pub(super) fn print_source_file(&mut self, root: NodeIndex) {
        let arena = self.arena;
        let Some(file) = arena.get_source_file(root) else {
            return;
        };
        self.print_statement_list(&file.statements);
        self.print_dangling_comment_lines(root);
        tracing::trace!(bytes = self.output.len(), "printed source file");
    }

    /// Each statement on its own line with its comments; a blank line is
    /// kept wherever the statement is flagged with one.
    pub(super) fn print_statement_list(&mut self, statements: &NodeList) {
        let arena = self.arena;
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 && arena.has_blank_line_before(statement) {
                self.write_line();
            }
            self.print_leading_comment_lines(statement);
            self.write_indent();
            self.print_statement(statement);
            self.print_trailing_comments(statement);
            self.write_line();
        }
    }

    /// `{ ... }` with its statements indented one level.
    pub(super) fn print_block(&mut self, block: NodeIndex) {
        let arena = self.arena;
        let Some(data) = arena.get_block(block) else {
            self.print_expression(block, PREC_ASSIGNMENT);
            return;
        };
        if data.statements.is_empty() && arena.dangling_comments(block).is_empty() {
            self.write("{}");
            return;
        }
        self.write_char('{');
        self.write_line();
        self.increase_indent();
        self.print_statement_list(&data.statements);
        self.print_dangling_comment_lines(block);
        self.decrease_indent();
        self.write_indent();
        self.write_char('}');
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Print one statement at the current position, without leading
    /// indentation, comments, or the final newline.
    pub(super) fn print_statement(&mut self, statement: NodeIndex) {
        let arena = self.arena;
        let Some(data) = arena.data(statement) else {
            return;
        };
        match data {
            NodeData::ExpressionStatement(expr) => {
                if self.needs_statement_parens(expr.expression) {
                    self.write_char('(');
                    self.print_expression(expr.expression, PREC_COMMA);
                    self.write_char(')');
                } else {
                    self.print_expression(expr.expression, PREC_COMMA);
                }
                self.write_char(';');
            }
            NodeData::VariableStatement(var) => {
                self.print_variable_declaration_list(var);
                self.write_char(';');
            }
            NodeData::Block(_) => self.print_block(statement),
            NodeData::Empty => self.write_char(';'),
            NodeData::Return(ret) => {
                self.write("return");
                if ret.expression.is_some() {
                    self.write_space();
                    self.print_expression(ret.expression, PREC_COMMA);
                }
                self.write_char(';');
            }
            NodeData::Throw(throw) => {
                self.write("throw ");
                self.print_expression(throw.expression, PREC_COMMA);
                self.write_char(';');
            }
            NodeData::If(stmt) => self.print_if_statement(stmt),
            NodeData::For(stmt) => self.print_for_statement(stmt),
            NodeData::ForInOf(stmt) => self.print_for_in_of_statement(stmt),
            NodeData::While(stmt) => {
                self.write("while (");
                self.print_expression(stmt.condition, PREC_COMMA);
                self.write_char(')');
                self.print_embedded_statement(stmt.statement);
            }
            NodeData::DoWhile(stmt) => {
                self.write("do");
                self.print_embedded_statement(stmt.statement);
                if arena.is_kind(stmt.statement, NodeKind::Block) {
                    self.write_space();
                } else {
                    self.write_line();
                    self.write_indent();
                }
                self.write("while (");
                self.print_expression(stmt.condition, PREC_COMMA);
                self.write(");");
            }
            NodeData::Break(jump) | NodeData::Continue(jump) => {
                let keyword = if matches!(data, NodeData::Break(_)) {
                    "break"
                } else {
                    "continue"
                };
                self.write(keyword);
                if jump.label.is_some() {
                    self.write_space();
                    self.print_expression(jump.label, PREC_PRIMARY);
                }
                self.write_char(';');
            }
            NodeData::Try(stmt) => self.print_try_statement(stmt),
            NodeData::Switch(stmt) => {
                self.write("switch (");
                self.print_expression(stmt.expression, PREC_COMMA);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                for clause in stmt.clauses.iter() {
                    self.print_leading_comment_lines(clause);
                    self.write_indent();
                    self.print_case_clause(clause);
                }
                self.print_dangling_comment_lines(statement);
                self.decrease_indent();
                self.write_indent();
                self.write_char('}');
            }
            NodeData::Labeled(labeled) => {
                self.print_expression(labeled.label, PREC_PRIMARY);
                self.write(": ");
                self.print_statement(labeled.statement);
            }
            NodeData::Debugger => self.write("debugger;"),
            NodeData::Function(func)
                if matches!(func.flavor, FunctionFlavor::Declaration | FunctionFlavor::Expression) =>
            {
                self.print_function(func)
            }
            NodeData::Class(class) => self.print_class(statement, class),
            NodeData::Import(import) => self.print_import_declaration(import),
            NodeData::Export(export) => self.print_export_declaration(export),
            _ => self.print_expression(statement, PREC_COMMA),
        }
    }

    /// Body of `if`/`for`/`while`: blocks stay on the header line, anything
    /// else moves to its own indented line.
    fn print_embedded_statement(&mut self, statement: NodeIndex) {
        if self.arena.is_kind(statement, NodeKind::Block) {
            self.write_space();
            self.print_block(statement);
        } else {
            self.increase_indent();
            self.write_line();
            self.write_indent();
            self.print_statement(statement);
            self.decrease_indent();
        }
    }

    fn print_if_statement(&mut self, stmt: &IfStatementData) {
        self.write("if (");
        self.print_expression(stmt.expression, PREC_COMMA);
        self.write_char(')');
        self.print_embedded_statement(stmt.then_statement);
        if stmt.else_statement.is_none() {
            return;
        }
        if self.arena.is_kind(stmt.then_statement, NodeKind::Block) {
            self.write(" else");
        } else {
            self.write_line();
            self.write_indent();
            self.write("else");
        }
        if self.arena.is_kind(stmt.else_statement, NodeKind::IfStatement) {
            self.write_space();
            self.print_statement(stmt.else_statement);
        } else {
            self.print_embedded_statement(stmt.else_statement);
        }
    }

    fn print_for_statement(&mut self, stmt: &ForData) {
        self.write("for (");
        self.print_for_initializer(stmt.initializer);
        self.write_char(';');
        if stmt.condition.is_some() {
            self.write_space();
            self.print_expression(stmt.condition, PREC_COMMA);
        }
        self.write_char(';');
        if stmt.incrementor.is_some() {
            self.write_space();
            self.print_expression(stmt.incrementor, PREC_COMMA);
        }
        self.write_char(')');
        self.print_embedded_statement(stmt.statement);
    }

    fn print_for_in_of_statement(&mut self, stmt: &ForInOfData) {
        self.write("for ");
        if stmt.await_modifier {
            self.write("await ");
        }
        self.write_char('(');
        self.print_for_initializer(stmt.initializer);
        self.write(if stmt.is_of { " of " } else { " in " });
        self.print_expression(stmt.expression, PREC_ASSIGNMENT);
        self.write_char(')');
        self.print_embedded_statement(stmt.statement);
    }

    fn print_for_initializer(&mut self, initializer: NodeIndex) {
        match self.arena.get_variable_statement(initializer) {
            Some(var) => self.print_variable_declaration_list(var),
            None => self.print_expression(initializer, PREC_COMMA),
        }
    }

    fn print_variable_declaration_list(&mut self, var: &VariableData) {
        self.write(var.kind.as_str());
        self.write_space();
        self.print_comma_list(&var.declarations);
    }

    fn print_try_statement(&mut self, stmt: &TryData) {
        self.write("try ");
        self.print_block(stmt.try_block);
        if let Some(NodeData::CatchClause(clause)) = self.arena.data(stmt.catch_clause) {
            self.write(" catch ");
            if clause.variable_declaration.is_some() {
                self.write_char('(');
                self.print_expression(clause.variable_declaration, PREC_ASSIGNMENT);
                self.write(") ");
            }
            self.print_block(clause.block);
        }
        if stmt.finally_block.is_some() {
            self.write(" finally ");
            self.print_block(stmt.finally_block);
        }
    }

    /// `case x:` or `default:` followed by the clause statements one level
    /// deeper. Ends at the start of a new line.
    fn print_case_clause(&mut self, clause: NodeIndex) {
        let Some(NodeData::CaseClause(data)) = self.arena.data(clause) else {
            return;
        };
        if data.expression.is_some() {
            self.write("case ");
            self.print_expression(data.expression, PREC_COMMA);
            self.write_char(':');
        } else {
            self.write("default:");
        }
        self.print_trailing_comments(clause);
        self.write_line();
        self.increase_indent();
        self.print_statement_list(&data.statements);
        self.print_dangling_comment_lines(clause);
        self.decrease_indent();
    }

    // =========================================================================
    // Modules
    // =========================================================================

    fn print_import_declaration(&mut self, import: &ImportDeclData) {
        self.write("import ");
        if import.is_side_effect_only() {
            self.print_expression(import.module_specifier, PREC_PRIMARY);
            self.write_char(';');
            return;
        }
        let mut wrote_binding = false;
        if import.default_binding.is_some() {
            self.print_expression(import.default_binding, PREC_PRIMARY);
            wrote_binding = true;
        }
        if import.namespace_binding.is_some() {
            if wrote_binding {
                self.write(", ");
            }
            self.write("* as ");
            self.print_expression(import.namespace_binding, PREC_PRIMARY);
            wrote_binding = true;
        }
        if let Some(named) = &import.named_bindings {
            // `import a, {} from 'x'` means the same as `import a from 'x'`.
            if !(wrote_binding && named.is_empty()) {
                if wrote_binding {
                    self.write(", ");
                }
                self.print_named_bindings(named, import.module_specifier);
            }
        }
        self.write(" from ");
        self.print_expression(import.module_specifier, PREC_PRIMARY);
        self.write_char(';');
    }

    /// `{ a, b as c }`, broken one binding per line when the whole
    /// declaration would pass the wrap column.
    fn print_named_bindings(&mut self, named: &NodeList, module_specifier: NodeIndex) {
        if named.is_empty() {
            self.write("{}");
            return;
        }
        let candidate = self.render_candidate(|p| {
            p.write("{ ");
            p.print_comma_list(named);
            p.write(" } from ");
            p.print_expression(module_specifier, PREC_PRIMARY);
            p.write_char(';');
        });
        if self.is_measuring() || self.fits_on_line(&candidate) {
            self.write("{ ");
            self.print_comma_list(named);
            self.write(" }");
            return;
        }
        self.write_char('{');
        self.increase_indent();
        for (i, specifier) in named.iter().enumerate() {
            self.write_line();
            self.write_indent();
            self.print_expression(specifier, PREC_PRIMARY);
            if i + 1 < named.len() {
                self.write_char(',');
            }
        }
        self.decrease_indent();
        self.write_line();
        self.write_indent();
        self.write_char('}');
    }

    fn print_export_declaration(&mut self, export: &ExportDeclData) {
        let arena = self.arena;
        self.write("export ");
        if export.is_default {
            self.write("default ");
        }
        if let Some(star) = export.star {
            self.write_char('*');
            if star.is_some() {
                self.write(" as ");
                self.print_expression(star, PREC_PRIMARY);
            }
        } else if let Some(named) = &export.named_exports {
            if named.is_empty() {
                self.write("{}");
            } else {
                self.write("{ ");
                self.print_comma_list(named);
                self.write(" }");
            }
        } else if export.declaration.is_some() {
            let is_declaration = match arena.data(export.declaration) {
                Some(NodeData::Function(func)) => !func.is_arrow(),
                Some(NodeData::Class(_)) => true,
                Some(data) => super::is_statement_kind(Some(data.kind())),
                None => false,
            };
            if is_declaration {
                self.print_statement(export.declaration);
                return;
            }
            self.print_expression(export.declaration, PREC_ASSIGNMENT);
            self.write_char(';');
            return;
        }
        if export.module_specifier.is_some() {
            self.write(" from ");
            self.print_expression(export.module_specifier, PREC_PRIMARY);
        }
        self.write_char(';');
    }
}
