//! Syntax tree nodes.
//!
//! Every node lives in a `NodeArena` and is addressed by `NodeIndex`. A node
//! carries its source span, a few flags, and a `NodeData` payload. Comments
//! are stored beside the nodes in a side table keyed by index so that
//! rewrites can move them between nodes without touching the payloads.

use qunitmod_common::comments::Comment;
use qunitmod_scanner::SyntaxKind;
use rustc_hash::FxHashMap;

use super::base::{NodeIndex, NodeList};

pub mod node_flags {
    pub const NONE: u16 = 0;
    /// A blank line separated this statement or property from the previous one.
    pub const BLANK_LINE_BEFORE: u16 = 1 << 0;
    /// Built by a rewrite rather than parsed.
    pub const SYNTHESIZED: u16 = 1 << 1;
}

/// Sentinel position for synthesized nodes.
pub const SYNTHESIZED_POS: u32 = u32::MAX;

#[derive(Clone, Debug)]
pub struct Node {
    pub pos: u32,
    pub end: u32,
    pub flags: u16,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    #[inline]
    pub fn is_synthesized(&self) -> bool {
        self.flags & node_flags::SYNTHESIZED != 0
    }

    #[inline]
    pub fn has_blank_line_before(&self) -> bool {
        self.flags & node_flags::BLANK_LINE_BEFORE != 0
    }
}

/// Comments attached to a node.
#[derive(Clone, Debug, Default)]
pub struct NodeComments {
    pub leading: Vec<Comment>,
    pub trailing: Vec<Comment>,
    /// Comments before the closing brace of a block, object, or file.
    pub dangling: Vec<Comment>,
}

impl NodeComments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty() && self.dangling.is_empty()
    }
}

// =============================================================================
// Node kinds
// =============================================================================

/// Discriminant of `NodeData`, used for kind filters in queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SourceFile,
    Identifier,
    PrivateIdentifier,
    StringLiteral,
    NumericLiteral,
    RegularExpressionLiteral,
    TemplateExpression,
    TaggedTemplateExpression,
    ThisKeyword,
    SuperKeyword,
    TrueKeyword,
    FalseKeyword,
    NullKeyword,
    ArrayLiteralExpression,
    ObjectLiteralExpression,
    PropertyAssignment,
    SpreadElement,
    FunctionExpression,
    ArrowFunction,
    FunctionDeclaration,
    MethodDeclaration,
    ClassExpression,
    ClassDeclaration,
    ClassMember,
    CallExpression,
    NewExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    PrefixUnaryExpression,
    PostfixUnaryExpression,
    AwaitExpression,
    YieldExpression,
    BinaryExpression,
    ConditionalExpression,
    ParenthesizedExpression,
    ExpressionStatement,
    VariableStatement,
    VariableDeclaration,
    Block,
    EmptyStatement,
    ReturnStatement,
    ThrowStatement,
    IfStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    WhileStatement,
    DoStatement,
    BreakStatement,
    ContinueStatement,
    TryStatement,
    CatchClause,
    SwitchStatement,
    CaseClause,
    LabeledStatement,
    DebuggerStatement,
    ImportDeclaration,
    ImportSpecifier,
    ExportDeclaration,
    ExportSpecifier,
}

// =============================================================================
// Node payloads
// =============================================================================

#[derive(Clone, Debug)]
pub enum NodeData {
    SourceFile(SourceFileData),
    Identifier(IdentifierData),
    PrivateIdentifier(IdentifierData),
    StringLiteral(LiteralData),
    NumericLiteral(LiteralData),
    RegularExpressionLiteral(LiteralData),
    Template(TemplateData),
    TaggedTemplate(TaggedTemplateData),
    /// `this`, `super`, `true`, `false`, `null`.
    Keyword(SyntaxKind),
    ArrayLiteral(ArrayLiteralData),
    ObjectLiteral(ObjectLiteralData),
    Property(PropertyData),
    Spread(UnaryLikeData),
    Function(FunctionData),
    Class(ClassData),
    ClassMember(ClassMemberData),
    Call(CallExprData),
    New(CallExprData),
    Access(AccessExprData),
    PrefixUnary(UnaryExprData),
    PostfixUnary(UnaryExprData),
    Await(UnaryLikeData),
    Yield(YieldData),
    Binary(BinaryExprData),
    Conditional(ConditionalExprData),
    Parenthesized(UnaryLikeData),
    ExpressionStatement(UnaryLikeData),
    VariableStatement(VariableData),
    VariableDeclaration(VariableDeclarationData),
    Block(BlockData),
    Empty,
    Return(UnaryLikeData),
    Throw(UnaryLikeData),
    If(IfStatementData),
    For(ForData),
    ForInOf(ForInOfData),
    While(LoopData),
    DoWhile(LoopData),
    Break(JumpData),
    Continue(JumpData),
    Try(TryData),
    CatchClause(CatchClauseData),
    Switch(SwitchData),
    CaseClause(CaseClauseData),
    Labeled(LabeledData),
    Debugger,
    Import(ImportDeclData),
    ImportSpecifier(SpecifierData),
    Export(ExportDeclData),
    ExportSpecifier(SpecifierData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::SourceFile(_) => NodeKind::SourceFile,
            NodeData::Identifier(_) => NodeKind::Identifier,
            NodeData::PrivateIdentifier(_) => NodeKind::PrivateIdentifier,
            NodeData::StringLiteral(_) => NodeKind::StringLiteral,
            NodeData::NumericLiteral(_) => NodeKind::NumericLiteral,
            NodeData::RegularExpressionLiteral(_) => NodeKind::RegularExpressionLiteral,
            NodeData::Template(_) => NodeKind::TemplateExpression,
            NodeData::TaggedTemplate(_) => NodeKind::TaggedTemplateExpression,
            NodeData::Keyword(kind) => match kind {
                SyntaxKind::SuperKeyword => NodeKind::SuperKeyword,
                SyntaxKind::TrueKeyword => NodeKind::TrueKeyword,
                SyntaxKind::FalseKeyword => NodeKind::FalseKeyword,
                SyntaxKind::NullKeyword => NodeKind::NullKeyword,
                _ => NodeKind::ThisKeyword,
            },
            NodeData::ArrayLiteral(_) => NodeKind::ArrayLiteralExpression,
            NodeData::ObjectLiteral(_) => NodeKind::ObjectLiteralExpression,
            NodeData::Property(_) => NodeKind::PropertyAssignment,
            NodeData::Spread(_) => NodeKind::SpreadElement,
            NodeData::Function(func) => match func.flavor {
                FunctionFlavor::Expression => NodeKind::FunctionExpression,
                FunctionFlavor::Arrow => NodeKind::ArrowFunction,
                FunctionFlavor::Declaration => NodeKind::FunctionDeclaration,
                FunctionFlavor::Method => NodeKind::MethodDeclaration,
            },
            NodeData::Class(class) => {
                if class.is_declaration {
                    NodeKind::ClassDeclaration
                } else {
                    NodeKind::ClassExpression
                }
            }
            NodeData::ClassMember(_) => NodeKind::ClassMember,
            NodeData::Call(_) => NodeKind::CallExpression,
            NodeData::New(_) => NodeKind::NewExpression,
            NodeData::Access(access) => {
                if access.computed {
                    NodeKind::ElementAccessExpression
                } else {
                    NodeKind::PropertyAccessExpression
                }
            }
            NodeData::PrefixUnary(_) => NodeKind::PrefixUnaryExpression,
            NodeData::PostfixUnary(_) => NodeKind::PostfixUnaryExpression,
            NodeData::Await(_) => NodeKind::AwaitExpression,
            NodeData::Yield(_) => NodeKind::YieldExpression,
            NodeData::Binary(_) => NodeKind::BinaryExpression,
            NodeData::Conditional(_) => NodeKind::ConditionalExpression,
            NodeData::Parenthesized(_) => NodeKind::ParenthesizedExpression,
            NodeData::ExpressionStatement(_) => NodeKind::ExpressionStatement,
            NodeData::VariableStatement(_) => NodeKind::VariableStatement,
            NodeData::VariableDeclaration(_) => NodeKind::VariableDeclaration,
            NodeData::Block(_) => NodeKind::Block,
            NodeData::Empty => NodeKind::EmptyStatement,
            NodeData::Return(_) => NodeKind::ReturnStatement,
            NodeData::Throw(_) => NodeKind::ThrowStatement,
            NodeData::If(_) => NodeKind::IfStatement,
            NodeData::For(_) => NodeKind::ForStatement,
            NodeData::ForInOf(data) => {
                if data.is_of {
                    NodeKind::ForOfStatement
                } else {
                    NodeKind::ForInStatement
                }
            }
            NodeData::While(_) => NodeKind::WhileStatement,
            NodeData::DoWhile(_) => NodeKind::DoStatement,
            NodeData::Break(_) => NodeKind::BreakStatement,
            NodeData::Continue(_) => NodeKind::ContinueStatement,
            NodeData::Try(_) => NodeKind::TryStatement,
            NodeData::CatchClause(_) => NodeKind::CatchClause,
            NodeData::Switch(_) => NodeKind::SwitchStatement,
            NodeData::CaseClause(_) => NodeKind::CaseClause,
            NodeData::Labeled(_) => NodeKind::LabeledStatement,
            NodeData::Debugger => NodeKind::DebuggerStatement,
            NodeData::Import(_) => NodeKind::ImportDeclaration,
            NodeData::ImportSpecifier(_) => NodeKind::ImportSpecifier,
            NodeData::Export(_) => NodeKind::ExportDeclaration,
            NodeData::ExportSpecifier(_) => NodeKind::ExportSpecifier,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

#[derive(Clone, Debug)]
pub struct IdentifierData {
    pub escaped_text: String,
}

/// String, numeric, and regex literals.
#[derive(Clone, Debug)]
pub struct LiteralData {
    /// Cooked value for strings, source text for numbers and regexes.
    pub text: String,
    /// Source text including quotes; `None` for synthesized strings.
    pub raw: Option<String>,
}

/// Template literal. `quasis` holds raw text and has one more entry than
/// `expressions`.
#[derive(Clone, Debug)]
pub struct TemplateData {
    pub quasis: Vec<String>,
    pub expressions: NodeList,
}

#[derive(Clone, Debug)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub template: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ArrayLiteralData {
    /// Holes are `NodeIndex::NONE`.
    pub elements: NodeList,
    pub multi_line: bool,
}

#[derive(Clone, Debug)]
pub struct ObjectLiteralData {
    pub properties: NodeList,
    /// The source object had a line break after `{`.
    pub multi_line: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// `key: value`
    Init,
    /// `key` or `key = default` in a pattern.
    Shorthand,
    /// `key() {}`; the initializer is a method-flavored function.
    Method,
    Getter,
    Setter,
}

#[derive(Clone, Debug)]
pub struct PropertyData {
    pub name: NodeIndex,
    /// Value expression, method function, or shorthand default. `NONE` for
    /// a plain shorthand.
    pub initializer: NodeIndex,
    pub kind: PropertyKind,
    pub computed: bool,
}

/// Payload with a single child expression.
#[derive(Clone, Debug)]
pub struct UnaryLikeData {
    pub expression: NodeIndex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionFlavor {
    Expression,
    Arrow,
    Declaration,
    Method,
}

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: NodeList,
    /// A `Block`, or an expression for concise arrow bodies.
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
    pub flavor: FunctionFlavor,
    /// Arrow parameters were written inside parentheses.
    pub parenthesized_params: bool,
}

impl FunctionData {
    pub fn is_arrow(&self) -> bool {
        self.flavor == FunctionFlavor::Arrow
    }
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    pub heritage: NodeIndex,
    pub members: NodeList,
    pub is_declaration: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassMemberKind {
    Method,
    Getter,
    Setter,
    Field,
    StaticBlock,
}

#[derive(Clone, Debug)]
pub struct ClassMemberData {
    pub name: NodeIndex,
    /// Method function, field initializer, or static block.
    pub value: NodeIndex,
    pub kind: ClassMemberKind,
    pub is_static: bool,
    pub computed: bool,
}

/// Call and `new` expressions.
#[derive(Clone, Debug)]
pub struct CallExprData {
    pub expression: NodeIndex,
    pub arguments: NodeList,
    pub question_dot: bool,
}

/// `a.b` and `a[b]`.
#[derive(Clone, Debug)]
pub struct AccessExprData {
    pub expression: NodeIndex,
    pub name_or_argument: NodeIndex,
    pub computed: bool,
    pub question_dot: bool,
}

#[derive(Clone, Debug)]
pub struct UnaryExprData {
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct YieldData {
    pub expression: NodeIndex,
    pub delegate: bool,
}

/// Binary operators, assignments, and the comma operator.
#[derive(Clone, Debug)]
pub struct BinaryExprData {
    pub left: NodeIndex,
    pub operator_token: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ConditionalExprData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Clone, Debug)]
pub struct VariableData {
    pub kind: VariableKind,
    pub declarations: NodeList,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Default)]
pub struct BlockData {
    pub statements: NodeList,
    /// The source block spanned more than one line.
    pub multi_line: bool,
}

#[derive(Clone, Debug)]
pub struct IfStatementData {
    pub expression: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ForData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ForInOfData {
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
    pub is_of: bool,
    pub await_modifier: bool,
}

#[derive(Clone, Debug)]
pub struct LoopData {
    pub condition: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TryData {
    pub try_block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CatchClauseData {
    pub variable_declaration: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub clauses: NodeList,
}

#[derive(Clone, Debug)]
pub struct CaseClauseData {
    /// `NONE` for `default:`.
    pub expression: NodeIndex,
    pub statements: NodeList,
}

#[derive(Clone, Debug)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportDeclData {
    pub default_binding: NodeIndex,
    pub namespace_binding: NodeIndex,
    /// `Some` when the declaration has a `{ ... }` clause, even an empty one.
    pub named_bindings: Option<NodeList>,
    pub module_specifier: NodeIndex,
}

impl ImportDeclData {
    /// `import 'x';` with no bindings at all.
    pub fn is_side_effect_only(&self) -> bool {
        self.default_binding.is_none()
            && self.namespace_binding.is_none()
            && self.named_bindings.is_none()
    }
}

/// Import and export specifiers. `property_name` is the imported (or local,
/// for exports) name when an `as` rename is present.
#[derive(Clone, Debug)]
pub struct SpecifierData {
    pub property_name: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExportDeclData {
    pub is_default: bool,
    /// Exported declaration or default expression.
    pub declaration: NodeIndex,
    pub named_exports: Option<NodeList>,
    /// `export * from` (`NONE`) or `export * as ns from` (the name).
    pub star: Option<NodeIndex>,
    pub module_specifier: NodeIndex,
}

// =============================================================================
// Arena
// =============================================================================

/// Storage for all nodes of one parsed file.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) comments: FxHashMap<NodeIndex, NodeComments>,
}
