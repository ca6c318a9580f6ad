//! Benchmarks for the module pipeline and the run-time lookup paths.
//!
//! - Registry: resolving an already loaded provider
//! - Modules: compiling and linking modules of growing size
//! - Lookup: free-variable resolution at growing scope depth
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mosaic::{
    CodeObject, CompilationError, CompiledCode, CompilerOptions, ErrorSink, ExecutionContext,
    FreeVariableReference, LanguageLocator, LanguageProvider, RaisingSink, Runtime, RuntimeError, Scope,
    SourceUnit, Symbol, TopLevelDecl, Value,
};
use std::hint::black_box;
use std::sync::Arc;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let frames = frame_view.lock().recent_frames().count();
    println!("\n=== Profiling: {} frames recorded ===\n", frames);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

// =============================================================================
// Bench language: one declared global per line
// =============================================================================

struct Declarations(Vec<Symbol>);

impl CompiledCode for Declarations {
    fn declarations(&self) -> Vec<TopLevelDecl> {
        self.0.iter().map(|&name| TopLevelDecl::new(name)).collect()
    }

    fn run(&self, ctx: &ExecutionContext) -> Result<Value, RuntimeError> {
        let scope = ctx.scope().ok_or_else(|| RuntimeError::other("no scope"))?;
        for (i, name) in self.0.iter().enumerate() {
            scope.set(*name, Value::Int(i as i64))?;
        }
        Ok(Value::Nil)
    }
}

struct Lines;

impl LanguageProvider for Lines {
    fn name(&self) -> &str {
        "lines"
    }

    fn compile_source_code(
        &self,
        unit: &SourceUnit,
        _sink: &dyn ErrorSink,
        _options: &CompilerOptions,
    ) -> Result<CodeObject, CompilationError> {
        let names = unit.text().lines().map(Symbol::intern).collect();
        Ok(CodeObject::new(unit.id(), self.name(), Arc::new(Declarations(names))))
    }
}

fn runtime() -> Runtime {
    let runtime = Runtime::new();
    runtime
        .register_provider(
            LanguageLocator::resolved("Lines", || Ok(Arc::new(Lines) as Arc<dyn LanguageProvider>)),
            false,
            &["lines", ".lines"],
        )
        .unwrap();
    runtime
}

fn source(globals: usize) -> String {
    (0..globals).map(|i| format!("global_{}\n", i)).collect()
}

// =============================================================================
// Benchmarks
// =============================================================================

fn registry_benchmarks(c: &mut Criterion) {
    let runtime = runtime();
    runtime.get_provider("lines").unwrap();

    let mut group = c.benchmark_group("registry");
    group.bench_function("resolve_loaded", |b| {
        b.iter(|| black_box(runtime.get_provider(black_box("LINES")).unwrap()))
    });
    group.bench_function("resolve_by_extension", |b| {
        b.iter(|| black_box(runtime.get_provider_by_extension(black_box("lines")).unwrap()))
    });
    group.finish();
}

fn module_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let runtime = runtime();

    let mut group = c.benchmark_group("module/globals");
    for globals in [10, 100, 1000] {
        let text = source(globals);
        group.throughput(Throughput::Elements(globals as u64));
        group.bench_with_input(BenchmarkId::new("compile_and_run", globals), &text, |b, text| {
            b.iter(|| {
                let unit = SourceUnit::new("bench.lines", black_box(text));
                let module = runtime
                    .compile_module_with("bench", Scope::new().shared(), &RaisingSink, &[unit])
                    .unwrap();
                module.execute().unwrap();
                end_profiling_frame();
                black_box(module)
            });
        });
    }
    group.finish();

    // Linked static slots are never reclaimed, so keep this workload small.
    let text = source(10);
    c.bench_function("module/link_10_globals", |b| {
        b.iter(|| {
            let unit = SourceUnit::new("bench.lines", black_box(&text));
            let module = runtime.compile_module("bench", &[unit]).unwrap();
            end_profiling_frame();
            black_box(module)
        });
    });
    print_profiling_stats();
}

fn lookup_benchmarks(c: &mut Criterion) {
    let name = FreeVariableReference::named("needle").unwrap();
    let mut group = c.benchmark_group("lookup/free_variable");

    for depth in [1, 8, 64] {
        let outer = Scope::new().shared();
        outer.set(name.name(), Value::Int(1)).unwrap();
        let mut ctx = ExecutionContext::for_scope(outer);
        for _ in 1..depth {
            ctx = ctx.push(Scope::new().shared());
        }

        group.bench_with_input(BenchmarkId::from_parameter(depth), &ctx, |b, ctx| {
            b.iter(|| black_box(name.evaluate(black_box(ctx)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    registry_benchmarks,
    module_benchmarks,
    lookup_benchmarks
);
criterion_main!(benches);
