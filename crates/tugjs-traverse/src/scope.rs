// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Lexical scopes and bindings.
//!
//! A scope is created for every path whose node opens one (see
//! [`tugjs_ast::types::is_scope`]) and is cached on that path, so visiting
//! the same block again under the same parent scope reuses it.
//!
//! # JavaScript Scoping Rules
//!
//! - `var` declarations and function parameters belong to the nearest
//!   function (or the program).
//! - `let`, `const`, class and nested function declarations belong to the
//!   nearest block scope.
//! - The body block of a function, loop or catch clause shares the scope of
//!   its owner rather than opening its own.
//!
//! A binding is constant unless its name is assigned or updated anywhere
//! inside the scope's block, or it is declared more than once.

use std::fmt;

use tracing::debug;
use tugjs_ast::types;
use tugjs_ast::{Ast, Container, DeclarationKind, Field, NodeId, NodeKind, PathKey, Slot};

use crate::arena::PathId;
use crate::error::{TraverseError, TraverseResult};
use crate::session::Session;

/// Handle to a scope record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// What kind of node opened a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
    Loop,
    Catch,
}

impl ScopeKind {
    fn for_kind(kind: NodeKind) -> ScopeKind {
        match kind {
            NodeKind::Program => ScopeKind::Program,
            NodeKind::CatchClause => ScopeKind::Catch,
            k if k.is_function() => ScopeKind::Function,
            NodeKind::ForStatement | NodeKind::ForInStatement | NodeKind::ForOfStatement => {
                ScopeKind::Loop
            }
            _ => ScopeKind::Block,
        }
    }

    /// Program and function scopes receive `var` declarations.
    pub fn is_function_level(&self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

/// How a binding was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Param,
    Class,
    CatchParam,
    /// A `var` lifted out of a synthetic closure.
    Hoisted,
}

impl From<DeclarationKind> for BindingKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Var => BindingKind::Var,
            DeclarationKind::Let => BindingKind::Let,
            DeclarationKind::Const => BindingKind::Const,
        }
    }
}

/// A declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub kind: BindingKind,
    /// The defining path: a declarator, declaration or parameter.
    pub path: PathId,
    /// The identifier node that introduces the name.
    pub identifier: NodeId,
    pub constant: bool,
}

/// One lexical scope.
#[derive(Debug, Clone)]
pub struct ScopeRecord {
    /// Path of the node that opened the scope.
    pub path: PathId,
    /// The node that opened the scope.
    pub block: NodeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    pub bindings: Vec<Binding>,
    /// The leading `var` declaration that hoisted names were added to.
    pub hoisted_declaration: Option<NodeId>,
    /// The scope belongs to a synthetic closure.
    pub shadow: bool,
}

impl ScopeRecord {
    pub fn own_binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|binding| binding.name == name)
    }

    pub fn has_own_binding(&self, name: &str) -> bool {
        self.own_binding(name).is_some()
    }
}

/// All scopes created during a session.
#[derive(Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<ScopeRecord>,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree::default()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn get(&self, id: ScopeId) -> &ScopeRecord {
        &self.scopes[id.0 as usize]
    }

    pub(crate) fn get_mut(&mut self, id: ScopeId) -> &mut ScopeRecord {
        &mut self.scopes[id.0 as usize]
    }

    fn push(&mut self, record: ScopeRecord) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(record);
        id
    }

    /// Look `name` up through `scope` and its ancestors.
    pub fn get_binding(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.get(id);
            if let Some(binding) = record.own_binding(name) {
                return Some(binding);
            }
            current = record.parent;
        }
        None
    }

    /// The nearest program or non-synthetic function scope.
    pub fn function_parent(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = self.get(id);
            if record.kind.is_function_level() && !record.shadow {
                return Some(id);
            }
            current = record.parent;
        }
        None
    }

    /// Scope ids from `scope` outward.
    pub fn ancestry(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut out = Vec::new();
        let mut current = Some(scope);
        while let Some(id) = current {
            out.push(id);
            current = self.get(id).parent;
        }
        out
    }
}

impl Session {
    /// The scope for a scope-opening `node` at `path`.
    ///
    /// Reuses the path's cached scope when it was built for the same block
    /// under the same parent; otherwise creates and crawls a new one.
    pub(crate) fn scope_for(
        &mut self,
        path: PathId,
        node: NodeId,
        enclosing: Option<ScopeId>,
        cached: Option<ScopeId>,
    ) -> Option<ScopeId> {
        if let Some(parent) = enclosing {
            if self.scopes.get(parent).block == node {
                return Some(parent);
            }
        }
        if let Some(scope) = cached {
            let record = self.scopes.get(scope);
            if record.block == node && record.parent == enclosing {
                return Some(scope);
            }
        }

        let kind = self.ast.kind(node);
        let scope = self.scopes.push(ScopeRecord {
            path,
            block: node,
            parent: enclosing,
            kind: ScopeKind::for_kind(kind),
            bindings: Vec::new(),
            hoisted_declaration: None,
            shadow: self.ast.node(node).shadow,
        });
        debug!(%scope, %path, kind = %kind, "created scope");

        // children look their scope up through this path while crawling
        self.paths.record_mut(path).scope = Some(scope);
        self.crawl(scope);
        Some(scope)
    }

    /// Look `name` up from `scope` outward.
    pub fn get_binding(&self, scope: Option<ScopeId>, name: &str) -> Option<&Binding> {
        scope.and_then(|scope| self.scopes.get_binding(scope, name))
    }

    fn crawl(&mut self, scope: ScopeId) {
        let record = self.scopes.get(scope);
        let path = record.path;
        let block = record.block;
        let kind = record.kind;
        let function_level = kind.is_function_level();
        let block_kind = self.ast.kind(block);

        match kind {
            ScopeKind::Function => {
                if block_kind == NodeKind::FunctionExpression {
                    if let Some(id) = self.ast.child(block, "id") {
                        self.register_names(scope, BindingKind::Function, path, id);
                    }
                }
                if let Ok(params) = self.get_list(path, "params") {
                    for param in params {
                        if let Some(node) = self.node(param) {
                            self.register_names(scope, BindingKind::Param, param, node);
                        }
                    }
                }
                if let Ok(body) = self.get_child(path, "body") {
                    self.collect(scope, body, false, function_level);
                }
            }
            ScopeKind::Catch => {
                if let Ok(param) = self.get_child(path, "param") {
                    if let Some(node) = self.node(param) {
                        self.register_names(scope, BindingKind::CatchParam, param, node);
                    }
                }
                if let Ok(body) = self.get_child(path, "body") {
                    self.collect(scope, body, false, function_level);
                }
            }
            _ => {
                for child in self.child_paths(path) {
                    self.collect(scope, child, false, function_level);
                }
            }
        }

        let names: Vec<String> = self
            .scopes
            .get(scope)
            .bindings
            .iter()
            .map(|binding| binding.name.clone())
            .collect();
        for name in names {
            if is_reassigned(&self.ast, block, &name) {
                self.mark_non_constant(scope, &name);
            }
        }
        debug!(
            %scope,
            bindings = self.scopes.get(scope).bindings.len(),
            "crawled scope"
        );
    }

    /// Register the declarations under `path` that belong to `scope`.
    ///
    /// `nested` is set once the walk has entered a nested block scope; from
    /// there on only `var` declarations (for function-level scopes) count.
    fn collect(&mut self, scope: ScopeId, path: PathId, nested: bool, function_level: bool) {
        let node = match self.node(path) {
            Some(node) => node,
            None => return,
        };
        let kind = self.ast.kind(node);
        match kind {
            NodeKind::FunctionDeclaration => {
                if !nested {
                    if let Some(id) = self.ast.child(node, "id") {
                        self.register_names(scope, BindingKind::Function, path, id);
                    }
                }
                return;
            }
            NodeKind::FunctionExpression | NodeKind::ArrowFunctionExpression => return,
            NodeKind::ClassDeclaration => {
                if !nested {
                    if let Some(id) = self.ast.child(node, "id") {
                        self.register_names(scope, BindingKind::Class, path, id);
                    }
                }
                return;
            }
            NodeKind::VariableDeclaration => {
                let declaration_kind = self
                    .ast
                    .node(node)
                    .declaration_kind
                    .unwrap_or(DeclarationKind::Var);
                let register = match declaration_kind {
                    DeclarationKind::Var => function_level,
                    DeclarationKind::Let | DeclarationKind::Const => !nested,
                };
                if register {
                    if let Ok(declarators) = self.get_list(path, "declarations") {
                        for declarator in declarators {
                            let id = self
                                .node(declarator)
                                .and_then(|d| self.ast.child(d, "id"));
                            if let Some(id) = id {
                                self.register_names(
                                    scope,
                                    BindingKind::from(declaration_kind),
                                    declarator,
                                    id,
                                );
                            }
                        }
                    }
                }
                return;
            }
            _ => {}
        }

        let opens_scope = types::is_scope(&self.ast, node, Some(self.parent(path)));
        let nested = nested || opens_scope;
        if nested && !function_level {
            return;
        }
        for child in self.child_paths(path) {
            self.collect(scope, child, nested, function_level);
        }
    }

    /// Paths for every occupied child slot of the node at `path`.
    pub(crate) fn child_paths(&mut self, path: PathId) -> Vec<PathId> {
        let node = match self.node(path) {
            Some(node) => node,
            None => return Vec::new(),
        };
        let fields: Vec<(&'static str, bool, usize)> = self
            .ast
            .node(node)
            .fields
            .iter()
            .map(|(key, field)| match field {
                Field::Single(slot) => (*key, false, usize::from(!slot.is_empty())),
                Field::List(slots) => (*key, true, slots.len()),
            })
            .collect();

        let mut out = Vec::new();
        for (key, is_list, len) in fields {
            if is_list {
                let container = Container::List(node, key);
                for index in 0..len {
                    if self.ast.slot(container, PathKey::Index(index)).node().is_some() {
                        out.push(self.get(Some(path), None, container, PathKey::Index(index)));
                    }
                }
            } else if len > 0 {
                out.push(self.get(Some(path), None, Container::Node(node), PathKey::Field(key)));
            }
        }
        out
    }

    fn register_names(&mut self, scope: ScopeId, kind: BindingKind, path: PathId, target: NodeId) {
        for (name, identifier) in types::get_binding_identifiers(&self.ast, target) {
            self.register(
                scope,
                Binding {
                    name,
                    kind,
                    path,
                    identifier,
                    constant: true,
                },
            );
        }
    }

    fn register(&mut self, scope: ScopeId, binding: Binding) {
        let record = self.scopes.get_mut(scope);
        match record.bindings.iter_mut().find(|b| b.name == binding.name) {
            Some(existing) => existing.constant = false,
            None => record.bindings.push(binding),
        }
    }

    fn mark_non_constant(&mut self, scope: ScopeId, name: &str) {
        let record = self.scopes.get_mut(scope);
        if let Some(binding) = record.bindings.iter_mut().find(|b| b.name == name) {
            binding.constant = false;
        }
    }

    /// Declare `identifier` with `var` in the nearest function-level scope
    /// that is not a synthetic closure.
    ///
    /// The declarator is added to a single leading `var` declaration in that
    /// scope's body, created on first use. Returns the receiving scope.
    pub fn push_declaration(
        &mut self,
        scope: Option<ScopeId>,
        identifier: NodeId,
    ) -> TraverseResult<ScopeId> {
        let name = self
            .ast
            .node(identifier)
            .name
            .clone()
            .unwrap_or_default();
        let target = scope
            .and_then(|scope| self.scopes.function_parent(scope))
            .ok_or_else(|| {
                TraverseError::structural(
                    format!("no enclosing function or program scope to hoist `{}` into", name),
                    self.ast.node(identifier).loc.map(|loc| loc.start),
                )
            })?;

        let already_hoisted = self
            .scopes
            .get(target)
            .own_binding(&name)
            .is_some_and(|binding| binding.kind == BindingKind::Hoisted);
        if already_hoisted {
            return Ok(target);
        }

        let (body_path, body_owner) = self.hoist_body(target)?;
        let body = Container::List(body_owner, "body");
        let copy = self.ast.clone_node(identifier);
        self.ast.set_child(copy, "typeAnnotation", None);
        let declarator = self.ast.variable_declarator(copy, None);

        let existing = self
            .scopes
            .get(target)
            .hoisted_declaration
            .filter(|decl| self.ast.slot(body, PathKey::Index(0)) == Slot::Node(*decl));
        let declaration = match existing {
            Some(decl) => {
                if let Some(list) = self.ast.list_mut(decl, "declarations") {
                    list.push(Slot::Node(declarator));
                }
                decl
            }
            None => {
                let decl = self
                    .ast
                    .variable_declaration(DeclarationKind::Var, vec![declarator]);
                self.paths.shift_keys(body, 0, 1);
                if let Some(list) = self.ast.list_mut(body_owner, "body") {
                    list.insert(0, Slot::Node(decl));
                }
                self.scopes.get_mut(target).hoisted_declaration = Some(decl);
                decl
            }
        };

        let declaration_path = self.get(Some(body_path), None, body, PathKey::Index(0));
        let declarators = Container::List(declaration, "declarations");
        let index = self.ast.container_len(declarators).saturating_sub(1);
        let declarator_path = self.get(
            Some(declaration_path),
            None,
            declarators,
            PathKey::Index(index),
        );
        // the hoisted declarator replaces any binding crawled from the
        // original declaration
        let record = self.scopes.get_mut(target);
        record.bindings.retain(|binding| binding.name != name);
        record.bindings.push(Binding {
            name: name.clone(),
            kind: BindingKind::Hoisted,
            path: declarator_path,
            identifier: copy,
            constant: false,
        });
        debug!(%name, scope = %target, "hoisted declaration");
        Ok(target)
    }

    /// The path and node owning the statement list of a function-level scope.
    fn hoist_body(&mut self, scope: ScopeId) -> TraverseResult<(PathId, NodeId)> {
        let record = self.scopes.get(scope);
        let path = record.path;
        let block = record.block;
        if record.kind == ScopeKind::Program {
            return Ok((path, block));
        }
        if self.ast.child(block, "body").map(|b| self.ast.kind(b)) != Some(NodeKind::BlockStatement) {
            // expression-bodied arrow function
            types::ensure_block(&mut self.ast, block, "body");
        }
        let body_path = self.get_child(path, "body")?;
        let body = self
            .node(body_path)
            .ok_or_else(|| self.error_with_node(path, "function has no body to hoist into"))?;
        Ok((body_path, body))
    }
}

/// True if `name` is written anywhere under `block`.
fn is_reassigned(ast: &Ast, block: NodeId, name: &str) -> bool {
    let is_name = |id: Option<NodeId>| {
        id.map(|id| {
            let node = ast.node(id);
            node.kind == NodeKind::Identifier && node.name_is(name)
        })
        .unwrap_or(false)
    };
    let binds_name = |id: Option<NodeId>| {
        id.map(|id| {
            types::get_binding_identifiers(ast, id)
                .iter()
                .any(|(bound, _)| bound == name)
        })
        .unwrap_or(false)
    };

    ast.descendants(block).into_iter().any(|id| {
        let node = ast.node(id);
        match node.kind {
            NodeKind::AssignmentExpression => {
                let left = node.child("left");
                is_name(left) || binds_name(left)
            }
            NodeKind::UpdateExpression => is_name(node.child("argument")),
            NodeKind::ForInStatement | NodeKind::ForOfStatement => is_name(node.child("left")),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tugjs_ast::DeclarationKind;

    fn var(ast: &mut Ast, kind: DeclarationKind, name: &str, init: Option<NodeId>) -> NodeId {
        let id = ast.identifier(name);
        let declarator = ast.variable_declarator(id, init);
        ast.variable_declaration(kind, vec![declarator])
    }

    mod bindings {
        use super::*;

        #[test]
        fn program_scope_collects_vars_and_functions() {
            let mut ast = Ast::new();
            let one = ast.literal(1);
            let a = var(&mut ast, DeclarationKind::Var, "a", Some(one));
            let f_id = ast.identifier("f");
            let f_body = ast.block_statement(vec![]);
            let f = ast.function_declaration(f_id, vec![], f_body);
            ast.push_statements(vec![a, f]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let scope = session.scope(program).unwrap();
            let record = session.scopes().get(scope);
            assert_eq!(record.kind, ScopeKind::Program);
            let a = record.own_binding("a").unwrap();
            assert_eq!(a.kind, BindingKind::Var);
            assert!(a.constant);
            assert_eq!(session.kind(a.path), Some(NodeKind::VariableDeclarator));
            assert_eq!(
                session.scopes().get(scope).own_binding("f").unwrap().kind,
                BindingKind::Function
            );
        }

        #[test]
        fn var_in_nested_block_hoists_but_let_does_not() {
            let mut ast = Ast::new();
            let inner_var = var(&mut ast, DeclarationKind::Var, "v", None);
            let inner_let = var(&mut ast, DeclarationKind::Let, "l", None);
            let block = ast.block_statement(vec![inner_var, inner_let]);
            ast.push_statements(vec![block]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let program_scope = session.scope(program).unwrap();
            assert!(session.scopes().get(program_scope).has_own_binding("v"));
            assert!(!session.scopes().get(program_scope).has_own_binding("l"));

            let block_path = session.get_path(program, "body.0").unwrap();
            let block_scope = session.scope(block_path).unwrap();
            assert_ne!(block_scope, program_scope);
            assert!(session.scopes().get(block_scope).has_own_binding("l"));
            assert_eq!(
                session
                    .get_binding(Some(block_scope), "v")
                    .map(|b| b.kind),
                Some(BindingKind::Var)
            );
        }

        #[test]
        fn params_belong_to_function_scope() {
            let mut ast = Ast::new();
            let p = ast.identifier("p");
            let body = ast.block_statement(vec![]);
            let func = ast.function_expression(None, vec![p], body);
            let stmt = ast.expression_statement(func);
            ast.push_statements(vec![stmt]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let func_path = session.get_path(program, "body.0.expression").unwrap();
            let scope = session.scope(func_path).unwrap();
            let record = session.scopes().get(scope);
            assert_eq!(record.kind, ScopeKind::Function);
            assert_eq!(record.own_binding("p").unwrap().kind, BindingKind::Param);

            let body_path = session.get_child(func_path, "body").unwrap();
            assert_eq!(session.scope(body_path), Some(scope));
        }

        #[test]
        fn scope_is_reused_on_revisit() {
            let mut ast = Ast::new();
            let block = ast.block_statement(vec![]);
            ast.push_statements(vec![block]);
            let mut session = Session::new(ast);
            let program = session.program_path();
            let first = session.get_path(program, "body.0").unwrap();
            let scope = session.scope(first);
            let count = session.scopes().len();
            let again = session.get_path(program, "body.0").unwrap();
            assert_eq!(session.scope(again), scope);
            assert_eq!(session.scopes().len(), count);
        }
    }

    mod constancy {
        use super::*;

        #[test]
        fn assignment_makes_binding_non_constant() {
            let mut ast = Ast::new();
            let one = ast.literal(1);
            let decl = var(&mut ast, DeclarationKind::Var, "a", Some(one));
            let target = ast.identifier("a");
            let two = ast.literal(2);
            let assign = ast.assignment_expression("=", target, two);
            let stmt = ast.expression_statement(assign);
            ast.push_statements(vec![decl, stmt]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let scope = session.scope(program);
            assert!(!session.get_binding(scope, "a").unwrap().constant);
        }

        #[test]
        fn update_and_redeclaration_are_violations() {
            let mut ast = Ast::new();
            let a1 = var(&mut ast, DeclarationKind::Var, "a", None);
            let a2 = var(&mut ast, DeclarationKind::Var, "a", None);
            let b = var(&mut ast, DeclarationKind::Var, "b", None);
            let b_ref = ast.identifier("b");
            let update = ast.update_expression("++", b_ref, false);
            let stmt = ast.expression_statement(update);
            ast.push_statements(vec![a1, a2, b, stmt]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let scope = session.scope(program);
            assert!(!session.get_binding(scope, "a").unwrap().constant);
            assert!(!session.get_binding(scope, "b").unwrap().constant);
        }
    }

    mod hoisting {
        use super::*;

        #[test]
        fn push_declaration_creates_leading_var() {
            let mut ast = Ast::new();
            let x = ast.identifier("x");
            let stmt = ast.expression_statement(x);
            ast.push_statements(vec![stmt]);

            let mut session = Session::new(ast);
            let program = session.program_path();
            let first = session.get_path(program, "body.0").unwrap();
            let scope = session.scope(program);

            let a = session.ast_mut().identifier("a");
            let b = session.ast_mut().identifier("b");
            let target = session.push_declaration(scope, a).unwrap();
            session.push_declaration(scope, b).unwrap();

            assert_eq!(Some(target), scope);
            // the existing statement moved down by one
            assert_eq!(session.key(first), PathKey::Index(1));

            let body = session.ast().children(session.ast().program(), "body");
            assert_eq!(body.len(), 2);
            assert!(types::is_var(session.ast(), body[0]));
            assert_eq!(session.ast().children(body[0], "declarations").len(), 2);

            let binding = session.get_binding(scope, "a").unwrap();
            assert_eq!(binding.kind, BindingKind::Hoisted);
            assert!(!binding.constant);
        }

        #[test]
        fn push_declaration_without_scope_is_structural() {
            let mut ast = Ast::new();
            let a = ast.identifier("a");
            let mut session = Session::new(ast);
            assert!(matches!(
                session.push_declaration(None, a),
                Err(TraverseError::Structural { .. })
            ));
        }
    }
}
