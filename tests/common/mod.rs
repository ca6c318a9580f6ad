//! Shared fixtures for integration tests.
//!
//! `Tally` is a tiny guest language used to drive the runtime end to end.
//! One statement per line:
//!
//! ```text
//! # comment
//! name = 42
//! name = "text"
//! name = other
//! name = other + 1
//! ```
//!
//! Names on the right-hand side are read through a linked static slot when
//! the module has one, and through the scope chain otherwise.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use mosaic::{
    CodeObject, CompilationError, CompiledCode, CompilerOptions, Diagnostic, ErrorSink,
    ExecutionContext,
    FreeVariableReference, HostEnvironment, LanguageLocator, LanguageProvider, LinkedGlobals,
    Module, Runtime, RuntimeError, SourceUnit, Span, TopLevelDecl, Value,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// =============================================================================
// Tally language
// =============================================================================

#[derive(Debug, Clone)]
enum Expr {
    Int(i64),
    Str(String),
    Ref(FreeVariableReference),
    Add(FreeVariableReference, i64),
}

#[derive(Debug, Clone)]
struct Assign {
    target: FreeVariableReference,
    expr: Expr,
}

struct TallyCode {
    statements: Vec<Assign>,
    globals: OnceLock<LinkedGlobals>,
}

impl TallyCode {
    fn read(&self, ctx: &ExecutionContext, name: &FreeVariableReference) -> Result<Value, RuntimeError> {
        let linked = self
            .globals
            .get()
            .and_then(|g| g.slot(name.name()))
            .and_then(|slot| slot.get());
        match linked {
            Some(value) => Ok(value),
            None => name.evaluate(ctx),
        }
    }

    fn write(&self, ctx: &ExecutionContext, name: &FreeVariableReference, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.globals.get().and_then(|g| g.slot(name.name())) {
            return slot.set(value);
        }
        let scope = ctx
            .scope()
            .ok_or_else(|| RuntimeError::other("no scope to assign into"))?;
        scope.set(name.name(), value)
    }

    fn eval(&self, ctx: &ExecutionContext, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Str(s) => Ok(Value::str(s)),
            Expr::Ref(name) => self.read(ctx, name),
            Expr::Add(name, n) => {
                let base = self.read(ctx, name)?;
                let base = base.as_int().ok_or_else(|| RuntimeError::TypeMismatch {
                    expected: "int".to_string(),
                    actual: base.type_name().to_string(),
                })?;
                Ok(Value::Int(base + n))
            }
        }
    }
}

impl CompiledCode for TallyCode {
    fn declarations(&self) -> Vec<TopLevelDecl> {
        self.statements
            .iter()
            .map(|s| TopLevelDecl::new(s.target.name()))
            .collect()
    }

    fn link_globals(&self, globals: &LinkedGlobals) {
        let _ = self.globals.set(globals.clone());
    }

    fn run(&self, ctx: &ExecutionContext) -> Result<Value, RuntimeError> {
        let mut last = Value::Nil;
        for statement in &self.statements {
            last = self.eval(ctx, &statement.expr)?;
            self.write(ctx, &statement.target, last.clone())?;
        }
        Ok(last)
    }
}

/// The Tally language provider.
#[derive(Default)]
pub struct Tally {
    /// Modules this provider prepared a context for.
    pub contexts: Mutex<Vec<String>>,
    /// Units compiled with `debug_mode` set.
    pub debug_compiles: AtomicUsize,
}

impl Tally {
    fn parse_expr(text: &str) -> Option<Expr> {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Expr::Int(n));
        }
        if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return Some(Expr::Str(inner.to_string()));
        }
        if let Some((name, n)) = text.split_once('+') {
            let name = FreeVariableReference::named(name.trim()).ok()?;
            return Some(Expr::Add(name, n.trim().parse().ok()?));
        }
        if text.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return FreeVariableReference::named(text).ok().map(Expr::Ref);
        }
        None
    }

    fn parse_line(line: &str) -> Option<Assign> {
        let (target, expr) = line.split_once('=')?;
        Some(Assign {
            target: FreeVariableReference::named(target.trim()).ok()?,
            expr: Self::parse_expr(expr.trim())?,
        })
    }
}

impl LanguageProvider for Tally {
    fn name(&self) -> &str {
        "tally"
    }

    fn compile_source_code(
        &self,
        unit: &SourceUnit,
        sink: &dyn ErrorSink,
        options: &CompilerOptions,
    ) -> Result<CodeObject, CompilationError> {
        if options.debug_mode {
            self.debug_compiles.fetch_add(1, Ordering::SeqCst);
        }
        let mut statements = Vec::new();
        for (index, raw) in unit.text().lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Self::parse_line(line) {
                Some(assign) => statements.push(assign),
                None => sink.report(
                    Diagnostic::error(format!("cannot parse '{}'", line))
                        .in_source(unit.id())
                        .at(Span::new(index as u32 + 1, 1, line.len() as u32)),
                )?,
            }
        }
        Ok(CodeObject::new(
            unit.id(),
            self.name(),
            Arc::new(TallyCode {
                statements,
                globals: OnceLock::new(),
            }),
        ))
    }

    fn ensure_module_context(&self, module: &Module) {
        if let Ok(mut contexts) = self.contexts.lock() {
            contexts.push(module.name().to_string());
        }
    }
}

/// A locator that hands out `tally` and counts constructions.
pub fn tally_locator(tally: Arc<Tally>, constructed: Arc<AtomicUsize>) -> LanguageLocator {
    LanguageLocator::resolved("Tally", move || {
        constructed.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&tally) as Arc<dyn LanguageProvider>)
    })
}

/// A runtime with Tally registered as `tally`, `.tally` and `.tly`.
pub fn tally_runtime() -> (Runtime, Arc<Tally>) {
    init_logging();
    let tally = Arc::new(Tally::default());
    let runtime = Runtime::new();
    runtime
        .register_provider(
            tally_locator(Arc::clone(&tally), Arc::new(AtomicUsize::new(0))),
            false,
            &["tally", ".tally", ".tly"],
        )
        .unwrap();
    (runtime, tally)
}

// =============================================================================
// Hosts and scripts
// =============================================================================

/// Records the name of every created module.
#[derive(Default)]
pub struct RecordingHost {
    pub created: Mutex<Vec<String>>,
}

impl HostEnvironment for RecordingHost {
    fn module_created(&self, module: &Arc<Module>) {
        if let Ok(mut created) = self.created.lock() {
            created.push(module.name().to_string());
        }
    }
}

pub fn script_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_scripts")
        .join(filename)
}

/// Load a script from the test_scripts directory.
pub fn load_script(filename: &str) -> SourceUnit {
    let path = script_path(filename);
    SourceUnit::from_file(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}
