// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The closed table of node kinds, their aliases and their field schemas.
//!
//! Every kind is declared exactly once in the [`node_kinds!`] invocation
//! below. From that table the macro generates:
//!
//! - the [`NodeKind`] enum and its name lookup,
//! - [`NodeKind::aliases`] (the categories a kind belongs to),
//! - [`NodeKind::fields`] (the ordered child slots, which is also the
//!   order the walker visits them in),
//! - one `is_<kind>()` predicate per kind.
//!
//! Field keys use the ESTree spelling (`typeAnnotation`, `returnType`) so
//! that dotted path lookups read the same as the tree dump.

use serde::{Deserialize, Serialize};

/// Shape of a child slot declared by a kind's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// A single child (a single-slot container).
    Single,
    /// An ordered sequence of children.
    List,
    /// An ordered sequence that may only hold statements.
    Statements,
}

/// One entry of a kind's field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    /// ESTree field name.
    pub key: &'static str,
    /// Whether this is a single slot or a sequence.
    pub shape: FieldShape,
    /// Required single slots must never be left empty.
    pub required: bool,
}

impl FieldSpec {
    /// A required field.
    pub const fn required(key: &'static str, shape: FieldShape) -> Self {
        FieldSpec {
            key,
            shape,
            required: true,
        }
    }

    /// An optional field.
    pub const fn optional(key: &'static str, shape: FieldShape) -> Self {
        FieldSpec {
            key,
            shape,
            required: false,
        }
    }

    /// True for sequence-shaped fields.
    pub fn is_list(&self) -> bool {
        !matches!(self.shape, FieldShape::Single)
    }
}

/// Categories shared by several node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Alias {
    Statement,
    Expression,
    Function,
    Scopable,
    BlockParent,
    Loop,
    Declaration,
    Pattern,
    Flow,
}

impl Alias {
    /// All aliases, in declaration order.
    pub const ALL: &'static [Alias] = &[
        Alias::Statement,
        Alias::Expression,
        Alias::Function,
        Alias::Scopable,
        Alias::BlockParent,
        Alias::Loop,
        Alias::Declaration,
        Alias::Pattern,
        Alias::Flow,
    ];

    /// Returns the alias name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alias::Statement => "Statement",
            Alias::Expression => "Expression",
            Alias::Function => "Function",
            Alias::Scopable => "Scopable",
            Alias::BlockParent => "BlockParent",
            Alias::Loop => "Loop",
            Alias::Declaration => "Declaration",
            Alias::Pattern => "Pattern",
            Alias::Flow => "Flow",
        }
    }

    /// Look up an alias by name.
    pub fn from_name(name: &str) -> Option<Alias> {
        Alias::ALL.iter().copied().find(|alias| alias.as_str() == name)
    }
}

impl std::fmt::Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Generates the node-kind enum and its static tables.
macro_rules! node_kinds {
    (
        $(
            $(#[$meta:meta])*
            $kind:ident {
                aliases: [$($alias:ident),* $(,)?],
                fields: [$($req:ident($key:literal, $shape:ident)),* $(,)?] $(,)?
            }
        ),* $(,)?
    ) => {
        /// The syntactic kind of a node.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum NodeKind {
            $(
                $(#[$meta])*
                $kind,
            )*
        }

        impl NodeKind {
            /// All kinds, in declaration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$kind),*];

            /// Returns the ESTree type name.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(NodeKind::$kind => stringify!($kind),)*
                }
            }

            /// Look up a kind by its ESTree type name.
            pub fn from_name(name: &str) -> Option<NodeKind> {
                match name {
                    $(stringify!($kind) => Some(NodeKind::$kind),)*
                    _ => None,
                }
            }

            /// The aliases this kind belongs to.
            pub fn aliases(&self) -> &'static [Alias] {
                match self {
                    $(NodeKind::$kind => &[$(Alias::$alias),*],)*
                }
            }

            /// The ordered field schema for this kind.
            pub fn fields(&self) -> &'static [FieldSpec] {
                match self {
                    $(
                        NodeKind::$kind => {
                            const FIELDS: &[FieldSpec] =
                                &[$(FieldSpec::$req($key, FieldShape::$shape)),*];
                            FIELDS
                        }
                    )*
                }
            }
        }

        paste::paste! {
            impl NodeKind {
                $(
                    #[doc = concat!("True for [`NodeKind::", stringify!($kind), "`].")]
                    pub fn [<is_ $kind:snake>](&self) -> bool {
                        matches!(self, NodeKind::$kind)
                    }
                )*
            }
        }
    };
}

node_kinds! {
    /// Synthetic root holding the program.
    File { aliases: [], fields: [required("program", Single)] },
    Program { aliases: [Scopable, BlockParent], fields: [required("body", Statements)] },

    // Statements
    BlockStatement {
        aliases: [Scopable, BlockParent, Statement],
        fields: [required("body", Statements)],
    },
    ExpressionStatement { aliases: [Statement], fields: [required("expression", Single)] },
    EmptyStatement { aliases: [Statement], fields: [] },
    ReturnStatement { aliases: [Statement], fields: [optional("argument", Single)] },
    IfStatement {
        aliases: [Statement],
        fields: [
            required("test", Single),
            required("consequent", Single),
            optional("alternate", Single),
        ],
    },
    ForStatement {
        aliases: [Scopable, Statement, Loop, BlockParent],
        fields: [
            optional("init", Single),
            optional("test", Single),
            optional("update", Single),
            required("body", Single),
        ],
    },
    ForInStatement {
        aliases: [Scopable, Statement, Loop, BlockParent],
        fields: [required("left", Single), required("right", Single), required("body", Single)],
    },
    ForOfStatement {
        aliases: [Scopable, Statement, Loop, BlockParent],
        fields: [required("left", Single), required("right", Single), required("body", Single)],
    },
    WhileStatement {
        aliases: [Statement, Loop, BlockParent],
        fields: [required("test", Single), required("body", Single)],
    },
    DoWhileStatement {
        aliases: [Statement, Loop, BlockParent],
        fields: [required("body", Single), required("test", Single)],
    },
    BreakStatement { aliases: [Statement], fields: [optional("label", Single)] },
    ContinueStatement { aliases: [Statement], fields: [optional("label", Single)] },
    ThrowStatement { aliases: [Statement], fields: [required("argument", Single)] },
    TryStatement {
        aliases: [Statement],
        fields: [
            required("block", Single),
            optional("handler", Single),
            optional("finalizer", Single),
        ],
    },
    CatchClause {
        aliases: [Scopable, BlockParent],
        fields: [required("param", Single), required("body", Single)],
    },

    // Declarations
    VariableDeclaration {
        aliases: [Statement, Declaration],
        fields: [required("declarations", List)],
    },
    VariableDeclarator {
        aliases: [],
        fields: [required("id", Single), optional("init", Single)],
    },
    FunctionDeclaration {
        aliases: [Scopable, Function, Statement, Declaration],
        fields: [
            required("id", Single),
            required("params", List),
            required("body", Single),
            optional("returnType", Single),
        ],
    },
    ClassDeclaration {
        aliases: [Statement, Declaration],
        fields: [
            required("id", Single),
            optional("superClass", Single),
            required("body", Single),
        ],
    },
    ClassBody { aliases: [], fields: [required("body", List)] },

    // Expressions
    Identifier { aliases: [Expression, Pattern], fields: [optional("typeAnnotation", Single)] },
    Literal { aliases: [Expression], fields: [] },
    ThisExpression { aliases: [Expression], fields: [] },
    ArrayExpression { aliases: [Expression], fields: [required("elements", List)] },
    ObjectExpression { aliases: [Expression], fields: [required("properties", List)] },
    Property {
        aliases: [],
        fields: [required("key", Single), required("value", Single)],
    },
    FunctionExpression {
        aliases: [Scopable, Function, Expression],
        fields: [
            optional("id", Single),
            required("params", List),
            required("body", Single),
            optional("returnType", Single),
        ],
    },
    ArrowFunctionExpression {
        aliases: [Scopable, Function, Expression],
        fields: [
            required("params", List),
            required("body", Single),
            optional("returnType", Single),
        ],
    },
    UnaryExpression { aliases: [Expression], fields: [required("argument", Single)] },
    UpdateExpression { aliases: [Expression], fields: [required("argument", Single)] },
    BinaryExpression {
        aliases: [Expression],
        fields: [required("left", Single), required("right", Single)],
    },
    LogicalExpression {
        aliases: [Expression],
        fields: [required("left", Single), required("right", Single)],
    },
    AssignmentExpression {
        aliases: [Expression],
        fields: [required("left", Single), required("right", Single)],
    },
    ConditionalExpression {
        aliases: [Expression],
        fields: [
            required("test", Single),
            required("consequent", Single),
            required("alternate", Single),
        ],
    },
    CallExpression {
        aliases: [Expression],
        fields: [required("callee", Single), required("arguments", List)],
    },
    NewExpression {
        aliases: [Expression],
        fields: [required("callee", Single), required("arguments", List)],
    },
    MemberExpression {
        aliases: [Expression],
        fields: [required("object", Single), required("property", Single)],
    },
    SequenceExpression { aliases: [Expression], fields: [required("expressions", List)] },
    /// `do { ... }` expression whose value is its last statement.
    DoExpression { aliases: [Expression], fields: [required("body", Single)] },
    TypeCastExpression {
        aliases: [Flow, Expression],
        fields: [required("expression", Single), required("typeAnnotation", Single)],
    },

    // Patterns
    RestElement {
        aliases: [Pattern],
        fields: [required("argument", Single), optional("typeAnnotation", Single)],
    },
    ArrayPattern {
        aliases: [Pattern],
        fields: [required("elements", List), optional("typeAnnotation", Single)],
    },
    ObjectPattern {
        aliases: [Pattern],
        fields: [required("properties", List), optional("typeAnnotation", Single)],
    },
    AssignmentPattern {
        aliases: [Pattern],
        fields: [required("left", Single), required("right", Single)],
    },

    // Flow type annotations
    TypeAnnotation { aliases: [Flow], fields: [required("typeAnnotation", Single)] },
    GenericTypeAnnotation {
        aliases: [Flow],
        fields: [required("id", Single), optional("typeParameters", Single)],
    },
    TypeParameterInstantiation { aliases: [Flow], fields: [required("params", List)] },
    StringTypeAnnotation { aliases: [Flow], fields: [] },
    NumberTypeAnnotation { aliases: [Flow], fields: [] },
    BooleanTypeAnnotation { aliases: [Flow], fields: [] },
    AnyTypeAnnotation { aliases: [Flow], fields: [] },
}

impl NodeKind {
    /// True if this kind belongs to `alias`.
    pub fn has_alias(&self, alias: Alias) -> bool {
        self.aliases().contains(&alias)
    }

    /// The schema entry for `key`, if this kind declares it.
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|spec| spec.key == key)
    }

    /// True for kinds in the `Statement` alias.
    pub fn is_statement(&self) -> bool {
        self.has_alias(Alias::Statement)
    }

    /// True for kinds in the `Expression` alias.
    pub fn is_expression(&self) -> bool {
        self.has_alias(Alias::Expression)
    }

    /// True for kinds in the `Function` alias.
    pub fn is_function(&self) -> bool {
        self.has_alias(Alias::Function)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invokes `$callback!` with the name of every node kind.
///
/// Used by crates that generate one method per kind (for example the
/// `is_<kind>()` predicates on paths) so the list stays in one place.
#[macro_export]
macro_rules! with_node_kinds {
    ($callback:ident) => {
        $callback! {
            File, Program, BlockStatement, ExpressionStatement, EmptyStatement,
            ReturnStatement, IfStatement, ForStatement, ForInStatement, ForOfStatement,
            WhileStatement, DoWhileStatement, BreakStatement, ContinueStatement,
            ThrowStatement, TryStatement, CatchClause, VariableDeclaration,
            VariableDeclarator, FunctionDeclaration, ClassDeclaration, ClassBody,
            Identifier, Literal, ThisExpression, ArrayExpression, ObjectExpression,
            Property, FunctionExpression, ArrowFunctionExpression, UnaryExpression,
            UpdateExpression, BinaryExpression, LogicalExpression, AssignmentExpression,
            ConditionalExpression, CallExpression, NewExpression, MemberExpression,
            SequenceExpression, DoExpression, TypeCastExpression, RestElement,
            ArrayPattern, ObjectPattern, AssignmentPattern, TypeAnnotation,
            GenericTypeAnnotation, TypeParameterInstantiation, StringTypeAnnotation,
            NumberTypeAnnotation, BooleanTypeAnnotation, AnyTypeAnnotation,
        }
    };
}

/// Invokes `$callback!` with the name of every alias.
#[macro_export]
macro_rules! with_aliases {
    ($callback:ident) => {
        $callback! {
            Statement, Expression, Function, Scopable, BlockParent, Loop, Declaration,
            Pattern, Flow,
        }
    };
}
