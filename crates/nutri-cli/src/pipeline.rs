//! Unification pipeline with explicit stages.
//!
//! The `unify` run follows these stages in order:
//! 1. **Ingest**: discover and read source CSV files
//! 2. **Classify**: decide which tables carry ingredient and/or recipe data
//! 3. **Reconcile**: merge ingredient rows by identity, dedupe recipe rows
//! 4. **Output**: write the unified tables as CSV and/or JSON
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! The `substitutions` and `diet` runs reuse the ingest stage and write a
//! single JSON file each.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, info_span, warn};

use nutri_ingest::{
    SkippedSource, SourceEncoding, SourceKind, SourceTable, classify_header, list_csv_files,
    read_source, read_sources,
};
use nutri_model::FieldMapping;
use nutri_output::{
    write_canonical_csv, write_canonical_json, write_diet_json, write_substitutions_json,
};
use nutri_reconcile::{
    CanonicalStore, RecipeSet, ReconcileStats, Substitutions, coerce_diet_rows,
    dedupe_recipes_into, reconcile_into,
};
use nutri_standards::{Identity, ProfileKind, resolve_profile};

/// File stem of the unified ingredient table.
pub const INGREDIENTS_STEM: &str = "ingredients_unified";
/// File stem of the unified recipe table.
pub const RECIPES_STEM: &str = "recipes_unified";

/// Which file formats the `unify` run writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn writes_csv(self) -> bool {
        matches!(self, Self::Csv | Self::Both)
    }

    pub fn writes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

/// Options for a `unify` run.
#[derive(Debug, Clone)]
pub struct UnifyOptions {
    pub csv_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    /// Replaces the built-in ingredient profile.
    pub ingredient_profile: Option<PathBuf>,
    /// Replaces the built-in recipe profile.
    pub recipe_profile: Option<PathBuf>,
    /// Reconcile and report without writing files.
    pub dry_run: bool,
}

// ============================================================================
// Stage 0: Profiles
// ============================================================================

/// Mappings and identities used by a `unify` run.
#[derive(Debug, Clone)]
pub struct UnifyProfiles {
    pub ingredient_mapping: FieldMapping,
    pub key_field: String,
    pub recipe_mapping: FieldMapping,
    pub title_field: String,
    pub ingredients_field: String,
    pub recipe_keywords: Vec<String>,
}

impl UnifyProfiles {
    /// Loads the ingredient and recipe profiles, falling back to the built-ins.
    pub fn load(ingredient_profile: Option<&Path>, recipe_profile: Option<&Path>) -> Result<Self> {
        let ingredients = resolve_profile(ProfileKind::Ingredients, ingredient_profile)
            .context("load ingredient profile")?;
        let recipes = resolve_profile(ProfileKind::Recipes, recipe_profile)
            .context("load recipe profile")?;

        let Identity::Single(key_field) = ingredients.identity()? else {
            bail!(
                "ingredient profile {} must declare a single key_field",
                ingredients.name()
            );
        };
        let Identity::Composite(title_field, ingredients_field) = recipes.identity()? else {
            bail!(
                "recipe profile {} must declare a composite key",
                recipes.name()
            );
        };

        Ok(Self {
            ingredient_mapping: ingredients.field_mapping()?,
            key_field,
            recipe_mapping: recipes.field_mapping()?,
            title_field,
            ingredients_field,
            recipe_keywords: recipes.keywords().to_vec(),
        })
    }
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// Tables that were read, in file-name order.
    pub tables: Vec<SourceTable>,
    /// Files that could not be read.
    pub skipped: Vec<SkippedSource>,
}

/// Discover and read every CSV file in a directory.
pub fn ingest(csv_dir: &Path) -> Result<IngestResult> {
    let files = list_csv_files(csv_dir)
        .with_context(|| format!("list CSV files in {}", csv_dir.display()))?;
    info!(files = files.len(), "discovered source files");
    let (tables, skipped) = read_sources(&files);
    Ok(IngestResult { tables, skipped })
}

// ============================================================================
// Stage 2: Classify
// ============================================================================

/// A loaded table and what it was recognised as.
#[derive(Debug)]
pub struct ClassifiedSource {
    pub table: SourceTable,
    pub kind: SourceKind,
}

/// Classify each table by its header.
pub fn classify(tables: Vec<SourceTable>, profiles: &UnifyProfiles) -> Vec<ClassifiedSource> {
    tables
        .into_iter()
        .map(|table| {
            let kind = classify_header(
                &table.header,
                &profiles.ingredient_mapping,
                &profiles.recipe_keywords,
            );
            if kind.is_unclassified() {
                warn!(file = %table.file_name(), "no ingredient or recipe columns, ignoring");
            } else {
                debug!(
                    file = %table.file_name(),
                    ingredients = kind.ingredients,
                    recipes = kind.recipes,
                    "classified source"
                );
            }
            ClassifiedSource { table, kind }
        })
        .collect()
}

// ============================================================================
// Stage 3: Reconcile
// ============================================================================

/// Result of the reconcile stage.
#[derive(Debug)]
pub struct ReconcileResult {
    pub ingredients: CanonicalStore,
    pub recipes: RecipeSet,
}

/// Merge ingredient tables and dedupe recipe tables, in source order.
pub fn reconcile(sources: &[ClassifiedSource], profiles: &UnifyProfiles) -> ReconcileResult {
    let mut ingredients = CanonicalStore::new();
    let mut recipes = RecipeSet::new(&*profiles.title_field, &*profiles.ingredients_field);

    for source in sources {
        if source.kind.ingredients {
            reconcile_into(
                &mut ingredients,
                &source.table.records,
                &profiles.ingredient_mapping,
                &profiles.key_field,
            );
        }
        if source.kind.recipes {
            dedupe_recipes_into(&mut recipes, &source.table.records, &profiles.recipe_mapping);
        }
    }

    let stats = ingredients.stats();
    info!(
        rows = stats.input,
        entities = ingredients.len(),
        dropped = stats.dropped_unresolvable,
        "ingredients reconciled"
    );
    info!(
        recipes = recipes.len(),
        duplicates = recipes.duplicates(),
        unidentified = recipes.unidentified(),
        "recipes deduplicated"
    );
    ReconcileResult {
        ingredients,
        recipes,
    }
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Write the unified tables, returning the paths written.
pub fn output(
    result: &ReconcileResult,
    profiles: &UnifyProfiles,
    output_dir: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if format.writes_csv() {
        let path = output_dir.join(format!("{INGREDIENTS_STEM}.csv"));
        write_canonical_csv(&path, &profiles.ingredient_mapping, result.ingredients.records())
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);

        let path = output_dir.join(format!("{RECIPES_STEM}.csv"));
        write_canonical_csv(&path, &profiles.recipe_mapping, result.recipes.records())
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    if format.writes_json() {
        let path = output_dir.join(format!("{INGREDIENTS_STEM}.json"));
        write_canonical_json(&path, &profiles.ingredient_mapping, result.ingredients.records())
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);

        let path = output_dir.join(format!("{RECIPES_STEM}.json"));
        write_canonical_json(&path, &profiles.recipe_mapping, result.recipes.records())
            .with_context(|| format!("write {}", path.display()))?;
        written.push(path);
    }
    for path in &written {
        info!(path = %path.display(), "wrote output");
    }
    Ok(written)
}

// ============================================================================
// Runs
// ============================================================================

/// Per-file outcome shown in summaries.
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub file: String,
    pub encoding: Option<SourceEncoding>,
    pub rows: usize,
    pub kind: SourceKind,
    /// Why the file was skipped, if it was.
    pub error: Option<String>,
}

impl SourceSummary {
    fn loaded(table: &SourceTable, kind: SourceKind) -> Self {
        Self {
            file: table.file_name(),
            encoding: Some(table.encoding),
            rows: table.records.len(),
            kind,
            error: None,
        }
    }

    fn skipped(skipped: &SkippedSource) -> Self {
        Self {
            file: file_name(&skipped.path),
            encoding: None,
            rows: 0,
            kind: SourceKind::default(),
            error: Some(skipped.error.to_string()),
        }
    }
}

/// Outcome of a `unify` run.
#[derive(Debug)]
pub struct UnifyResult {
    pub output_dir: PathBuf,
    pub sources: Vec<SourceSummary>,
    pub ingredient_stats: ReconcileStats,
    pub ingredients: usize,
    pub recipes: usize,
    pub recipe_duplicates: usize,
    pub recipe_unidentified: usize,
    pub outputs: Vec<PathBuf>,
    pub dry_run: bool,
}

impl UnifyResult {
    /// True when any source file had to be skipped.
    pub fn has_errors(&self) -> bool {
        self.sources.iter().any(|source| source.error.is_some())
    }
}

/// Run every `unify` stage.
pub fn run_unify(options: &UnifyOptions) -> Result<UnifyResult> {
    let span = info_span!("unify", dir = %options.csv_dir.display());
    let _guard = span.enter();

    let profiles = UnifyProfiles::load(
        options.ingredient_profile.as_deref(),
        options.recipe_profile.as_deref(),
    )?;

    let IngestResult { tables, skipped } = ingest(&options.csv_dir)?;
    let classified = classify(tables, &profiles);

    let mut sources: Vec<SourceSummary> = skipped.iter().map(SourceSummary::skipped).collect();
    sources.extend(
        classified
            .iter()
            .map(|source| SourceSummary::loaded(&source.table, source.kind)),
    );
    sources.sort_by(|a, b| a.file.cmp(&b.file));

    let reconciled = reconcile(&classified, &profiles);

    let outputs = if options.dry_run {
        info!("dry run, no files written");
        Vec::new()
    } else {
        output(&reconciled, &profiles, &options.output_dir, options.format)?
    };

    Ok(UnifyResult {
        output_dir: options.output_dir.clone(),
        sources,
        ingredient_stats: reconciled.ingredients.stats(),
        ingredients: reconciled.ingredients.len(),
        recipes: reconciled.recipes.len(),
        recipe_duplicates: reconciled.recipes.duplicates(),
        recipe_unidentified: reconciled.recipes.unidentified(),
        outputs,
        dry_run: options.dry_run,
    })
}

/// Options for a `substitutions` run.
#[derive(Debug, Clone)]
pub struct SubstitutionsOptions {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub profile: Option<PathBuf>,
}

/// Outcome of a `substitutions` run.
#[derive(Debug)]
pub struct SubstitutionsResult {
    pub output: PathBuf,
    pub sources: Vec<SourceSummary>,
    /// Ingredients with at least one substitute.
    pub foods: usize,
}

impl SubstitutionsResult {
    pub fn has_errors(&self) -> bool {
        self.sources.iter().any(|source| source.error.is_some())
    }
}

/// Aggregate substitutes from every input file into one JSON object.
pub fn run_substitutions(options: &SubstitutionsOptions) -> Result<SubstitutionsResult> {
    let span = info_span!("substitutions");
    let _guard = span.enter();

    let profile = resolve_profile(ProfileKind::Substitutions, options.profile.as_deref())
        .context("load substitution profile")?;
    let mapping = profile.field_mapping()?;
    let rules = profile.substitute_rules()?;

    let (tables, skipped) = read_sources(&options.inputs);
    let mut substitutions = Substitutions::new();
    for table in &tables {
        substitutions.add_records(&table.records, &mapping, rules);
    }
    let map = substitutions.into_map();
    info!(foods = map.len(), "substitutions aggregated");

    write_substitutions_json(&options.output, &map)
        .with_context(|| format!("write {}", options.output.display()))?;

    let mut sources: Vec<SourceSummary> = skipped.iter().map(SourceSummary::skipped).collect();
    sources.extend(tables.iter().map(|table| {
        SourceSummary::loaded(
            table,
            SourceKind {
                ingredients: true,
                recipes: false,
            },
        )
    }));
    Ok(SubstitutionsResult {
        output: options.output.clone(),
        sources,
        foods: map.len(),
    })
}

/// Options for a `diet` run.
#[derive(Debug, Clone)]
pub struct DietOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub profile: Option<PathBuf>,
}

/// Outcome of a `diet` run.
#[derive(Debug)]
pub struct DietResult {
    pub output: PathBuf,
    pub encoding: SourceEncoding,
    pub rows: usize,
}

/// Coerce one diet table and write it as JSON.
pub fn run_diet(options: &DietOptions) -> Result<DietResult> {
    let span = info_span!("diet", file = %options.input.display());
    let _guard = span.enter();

    let profile = resolve_profile(ProfileKind::Diets, options.profile.as_deref())
        .context("load diet profile")?;
    let table = read_source(&options.input)
        .with_context(|| format!("read {}", options.input.display()))?;
    let rows = coerce_diet_rows(&table.records, profile.text_columns());
    write_diet_json(&options.output, &rows)
        .with_context(|| format!("write {}", options.output.display()))?;
    info!(rows = rows.len(), "diet rows written");

    Ok(DietResult {
        output: options.output.clone(),
        encoding: table.encoding,
        rows: rows.len(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
