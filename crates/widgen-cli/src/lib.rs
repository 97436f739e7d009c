//! The `widgen` pipeline: configuration in, generated source out.
//!
//! The binary (`src/main.rs`) is a thin clap layer over [`Settings`] and
//! [`run`]; integration tests drive it end to end through `assert_cmd`.

pub mod write;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use widgen_archive::Archive;
use widgen_catalog::{Catalog, ClassIndex};
use widgen_config::{NullabilityOverride, QuirkValue, WidgenConfig, CLASS_ALIAS_KEY};
use widgen_gen::{
    AnnotationOracle, ClassAlias, Generation, Generator, GeneratorOptions, Nullability,
    OracleChain, QuirksTable, RuntimeNames, TableOracle, DEFAULT_NON_NULL_ANNOTATIONS,
    DEFAULT_NULLABLE_ANNOTATIONS,
};

/// Everything one run needs, resolved from the config file and flags.
pub struct Settings {
    pub root: String,
    pub archives: Vec<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub options: GeneratorOptions,
    pub quirks: QuirksTable,
    pub oracle: OracleChain,
}

impl Settings {
    pub fn from_config(config: &WidgenConfig) -> Result<Self> {
        let Some(root) = config.root.clone() else {
            bail!("no root widget type configured (set `root` or pass --root)");
        };
        if config.archives.is_empty() {
            bail!("no archives configured (set `archives` or pass --archive)");
        }
        Ok(Self {
            root,
            archives: config.archives.clone(),
            classpath: config.classpath.clone(),
            output: config.output.path.clone(),
            options: generator_options(config),
            quirks: quirks_table(config),
            oracle: nullability_oracle(config),
        })
    }
}

fn generator_options(config: &WidgenConfig) -> GeneratorOptions {
    let defaults = GeneratorOptions::default();
    let rt = &config.runtime;
    let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);
    let runtime = RuntimeNames {
        attribute_setter: pick(&rt.attribute_setter, defaults.runtime.attribute_setter),
        renderable: pick(&rt.renderable, defaults.runtime.renderable),
        view_class_result: pick(&rt.view_class_result, defaults.runtime.view_class_result),
        construct: pick(&rt.construct, defaults.runtime.construct),
        apply_attribute: pick(&rt.apply_attribute, defaults.runtime.apply_attribute),
        render: pick(&rt.render, defaults.runtime.render),
        nullable_annotation: rt.nullable_annotation.clone(),
        non_null_annotation: rt.non_null_annotation.clone(),
    };
    GeneratorOptions {
        package: config.output.package.clone(),
        class_name: pick(&config.output.class_name, defaults.class_name),
        header: config.output.header.clone().unwrap_or(defaults.header),
        runtime,
    }
}

fn quirks_table(config: &WidgenConfig) -> QuirksTable {
    let mut table = QuirksTable::new();
    for (class, entries) in &config.quirks {
        for (key, value) in entries {
            match (key.as_str(), value) {
                (CLASS_ALIAS_KEY, QuirkValue::Code(name)) => {
                    table.set_alias(class, ClassAlias::Rename(name.clone()))
                }
                (CLASS_ALIAS_KEY, QuirkValue::Flag(_)) => table.set_alias(class, ClassAlias::Exclude),
                (_, QuirkValue::Code(code)) => table.replace(class, key.clone(), code.clone()),
                (_, QuirkValue::Flag(_)) => table.skip(class, key.clone()),
            }
        }
    }
    table
}

fn nullability_oracle(config: &WidgenConfig) -> OracleChain {
    let mut table = TableOracle::new();
    for (key, value) in &config.nullability.overrides {
        let nullability = match value {
            NullabilityOverride::Nullable => Nullability::Nullable,
            NullabilityOverride::NonNull => Nullability::NonNull,
        };
        table.insert(key.clone(), nullability);
    }
    let names = |configured: &Option<Vec<String>>, defaults: &[&str]| match configured {
        Some(names) => names.clone(),
        None => defaults.iter().map(|name| name.to_string()).collect(),
    };
    let annotations = AnnotationOracle::new(
        names(&config.nullability.nullable_annotations, DEFAULT_NULLABLE_ANNOTATIONS),
        names(&config.nullability.non_null_annotations, DEFAULT_NON_NULL_ANNOTATIONS),
    );
    OracleChain::new().with(table).with(annotations)
}

/// Scan the archives, build the catalog and generate.
pub fn run(settings: &Settings) -> Result<Generation> {
    let open = |paths: &[PathBuf]| -> Result<Vec<Archive>> {
        paths
            .iter()
            .map(|path| {
                Archive::open(path).with_context(|| format!("failed to open {}", path.display()))
            })
            .collect()
    };
    let scanned = open(&settings.archives)?;
    let classpath = open(&settings.classpath)?;

    let library = ClassIndex::scan(&scanned, &classpath).context("failed to read class files")?;
    let catalog = Catalog::build(
        &library.index,
        &settings.root,
        library.scanned.iter().map(String::as_str),
    )?;
    let generation = Generator::new(
        &library.index,
        &settings.oracle,
        &settings.quirks,
        &settings.options,
    )
    .generate(&catalog)?;
    Ok(generation)
}
