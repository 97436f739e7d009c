//! Java source rendering of a [`Document`].

use widgen_catalog::canonical_name;
use widgen_classfile::ReturnType;

use crate::dispatch::{Branch, DispatchCase, Invocation, Terminator, ValueTest, WrapperEntry};
use crate::doc::{Declaration, DispatchMethod, Document, RuntimeNames};
use crate::factory::FactoryEntry;
use crate::listener::ListenerWrapper;
use crate::nullability::Nullability;
use crate::types::java_type;

const INDENT: &str = "    ";

#[derive(Default)]
struct JavaWriter {
    out: String,
    depth: usize,
}

impl JavaWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    /// `text {` and indent.
    fn open(&mut self, text: impl AsRef<str>) {
        self.line(format!("{} {{", text.as_ref()));
        self.depth += 1;
    }

    /// Dedent and write `text`, e.g. `}` or `});`.
    fn close_with(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn close(&mut self) {
        self.close_with("}");
    }

    /// `} else {` and similar.
    fn reopen(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
        self.depth += 1;
    }

    /// Write a multi-line snippet at the current depth, keeping its relative
    /// indentation.
    fn snippet(&mut self, code: &str) {
        let lines: Vec<&str> = code.trim_matches('\n').lines().map(str::trim_end).collect();
        let common = lines
            .iter()
            .filter(|l| !l.is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);
        for line in lines {
            self.line(line.get(common..).unwrap_or(""));
        }
    }
}

/// Render `doc` as one Java compilation unit.
pub fn render(doc: &Document) -> String {
    let mut w = JavaWriter::default();
    for line in &doc.header {
        w.line(format!("// {line}"));
    }
    if !doc.header.is_empty() {
        w.blank();
    }
    if let Some(package) = &doc.package {
        w.line(format!("package {package};"));
        w.blank();
    }

    w.line("@SuppressWarnings({\"rawtypes\", \"unchecked\"})");
    w.open(format!(
        "public final class {} implements {}",
        doc.class_name, doc.runtime.attribute_setter
    ));
    for declaration in &doc.declarations {
        w.blank();
        match declaration {
            Declaration::Factory(factory) => write_factory(&mut w, &doc.runtime, factory),
            Declaration::Wrapper(wrapper) => write_wrapper(&mut w, &doc.runtime, wrapper),
            Declaration::Dispatch(method) => write_dispatch(&mut w, &doc.runtime, method),
        }
    }
    w.close();
    w.out
}

fn write_factory(w: &mut JavaWriter, rt: &RuntimeNames, factory: &FactoryEntry) {
    let class = canonical_name(&factory.class);
    w.open(format!(
        "public static {} {}()",
        rt.view_class_result, factory.function_name
    ));
    w.line(format!("return {}({class}.class);", rt.construct));
    w.close();
    w.blank();
    w.open(format!(
        "public static Void {}({} r)",
        factory.function_name, rt.renderable
    ));
    w.line(format!("return {}({class}.class, r);", rt.construct));
    w.close();
}

fn write_wrapper(w: &mut JavaWriter, rt: &RuntimeNames, wrapper: &WrapperEntry) {
    let annotation = if wrapper.param_type.is_primitive() {
        None
    } else {
        match wrapper.nullability {
            Nullability::Nullable => rt.nullable_annotation.as_deref(),
            Nullability::NonNull => rt.non_null_annotation.as_deref(),
            Nullability::Unknown => None,
        }
    };
    let annotation = annotation.map(|a| format!("@{a} ")).unwrap_or_default();
    w.open(format!(
        "public static Void {}({annotation}{} arg)",
        wrapper.function_name,
        java_type(&wrapper.param_type)
    ));
    w.line(format!(
        "return {}(\"{}\", arg);",
        rt.apply_attribute, wrapper.attribute
    ));
    w.close();
}

fn write_dispatch(w: &mut JavaWriter, rt: &RuntimeNames, method: &DispatchMethod) {
    w.open(format!(
        "public boolean set({} v, String name, final Object arg, final Object old)",
        canonical_name(&method.root)
    ));
    w.open("switch (name)");
    for case in &method.cases {
        write_case(w, rt, case);
    }
    w.close();
    w.line("return false;");
    w.close();
}

fn write_case(w: &mut JavaWriter, rt: &RuntimeNames, case: &DispatchCase) {
    w.line(format!("case \"{}\":", case.name));
    w.depth += 1;
    for branch in &case.branches {
        match branch {
            Branch::Verbatim(code) => w.snippet(code),
            Branch::Generated {
                target,
                value,
                invocation,
            } => {
                let receiver = match target {
                    Some(class) => format!("(({}) v)", canonical_name(class)),
                    None => "v".to_string(),
                };
                let mut tests = Vec::new();
                if let Some(class) = target {
                    tests.push(format!("v instanceof {}", canonical_name(class)));
                }
                if let Some(value) = value {
                    tests.push(value_test(value));
                }
                if tests.is_empty() {
                    write_invocation(w, rt, &receiver, invocation);
                } else {
                    w.open(format!("if ({})", tests.join(" && ")));
                    write_invocation(w, rt, &receiver, invocation);
                    w.close();
                }
            }
        }
    }
    if case.terminator == Terminator::Unhandled {
        w.line("break;");
    }
    w.depth -= 1;
}

fn value_test(test: &ValueTest) -> String {
    let ty = java_type(&test.ty);
    if test.accepts_null {
        format!("(arg == null || arg instanceof {ty})")
    } else {
        format!("arg instanceof {ty}")
    }
}

fn write_invocation(w: &mut JavaWriter, rt: &RuntimeNames, receiver: &str, invocation: &Invocation) {
    match invocation {
        Invocation::Setter { method, param_type } => {
            w.line(format!(
                "{receiver}.{method}(({}) arg);",
                java_type(param_type)
            ));
        }
        Invocation::Listener { method, wrapper } => {
            let interface = canonical_name(&wrapper.interface);
            w.open("if (arg != null)");
            w.open(format!("{receiver}.{method}(new {interface}()"));
            write_listener_methods(w, rt, &interface, wrapper);
            w.close_with("});");
            w.reopen("} else {");
            w.line(format!("{receiver}.{method}(({interface}) null);"));
            w.close();
        }
    }
    w.line("return true;");
}

fn write_listener_methods(
    w: &mut JavaWriter,
    rt: &RuntimeNames,
    interface: &str,
    wrapper: &ListenerWrapper,
) {
    for method in &wrapper.methods {
        let names = method.param_names();
        let params: Vec<String> = method
            .params
            .iter()
            .zip(&names)
            .map(|(ty, name)| format!("{} {name}", java_type(ty)))
            .collect();
        let return_type = match &method.return_type {
            ReturnType::Void => "void".to_string(),
            ReturnType::Type(ty) => java_type(ty),
        };
        let call = format!("(({interface}) arg).{}({})", method.name, names.join(", "));

        w.open(format!(
            "public {return_type} {}({})",
            method.name,
            params.join(", ")
        ));
        match method.return_type {
            ReturnType::Void => {
                w.line(format!("{call};"));
                w.line(format!("{}();", rt.render));
            }
            ReturnType::Type(_) => {
                w.line(format!("{return_type} r = {call};"));
                w.line(format!("{}();", rt.render));
                w.line("return r;");
            }
        }
        w.close();
    }
}
