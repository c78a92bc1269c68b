use anyhow::{Context, Result};
use comfy_table::Table;

use nutri_cli::pipeline::{
    self, DietOptions, DietResult, OutputFormat, SubstitutionsOptions, SubstitutionsResult,
    UnifyOptions, UnifyResult,
};
use nutri_standards::{Identity, Profile, ProfileKind, builtin_profile};

use crate::cli::{DietArgs, OutputFormatArg, ProfileKindArg, ProfilesArgs, SubstitutionsArgs, UnifyArgs};
use crate::summary::{apply_table_style, header_cell};

pub fn run_unify(args: &UnifyArgs) -> Result<UnifyResult> {
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.csv_dir.join("unified"));
    let options = UnifyOptions {
        csv_dir: args.csv_dir.clone(),
        output_dir,
        format: match args.format {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Both => OutputFormat::Both,
        },
        ingredient_profile: args.ingredient_profile.clone(),
        recipe_profile: args.recipe_profile.clone(),
        dry_run: args.dry_run,
    };
    pipeline::run_unify(&options)
}

pub fn run_substitutions(args: &SubstitutionsArgs) -> Result<SubstitutionsResult> {
    pipeline::run_substitutions(&SubstitutionsOptions {
        inputs: args.inputs.clone(),
        output: args.output.clone(),
        profile: args.profile.clone(),
    })
}

pub fn run_diet(args: &DietArgs) -> Result<DietResult> {
    pipeline::run_diet(&DietOptions {
        input: args.input.clone(),
        output: args.output.clone(),
        profile: args.profile.clone(),
    })
}

pub fn run_profiles(args: &ProfilesArgs) -> Result<()> {
    let kinds: Vec<ProfileKind> = match args.kind {
        Some(kind) => vec![profile_kind(kind)],
        None => ProfileKind::ALL.to_vec(),
    };
    for kind in kinds {
        let profile = builtin_profile(kind).with_context(|| format!("load {kind} profile"))?;
        print_profile(&profile)?;
    }
    Ok(())
}

fn profile_kind(arg: ProfileKindArg) -> ProfileKind {
    match arg {
        ProfileKindArg::Ingredients => ProfileKind::Ingredients,
        ProfileKindArg::Recipes => ProfileKind::Recipes,
        ProfileKindArg::Substitutions => ProfileKind::Substitutions,
        ProfileKindArg::Diets => ProfileKind::Diets,
    }
}

fn print_profile(profile: &Profile) -> Result<()> {
    println!("Profile: {} ({})", profile.name(), profile.kind());
    if let Some(description) = &profile.profile.description {
        println!("{description}");
    }
    match profile.kind() {
        ProfileKind::Ingredients | ProfileKind::Recipes => match profile.identity()? {
            Identity::Single(field) => println!("Identity: {field}"),
            Identity::Composite(first, second) => println!("Identity: ({first}, {second})"),
        },
        ProfileKind::Substitutions => {
            let rules = profile.substitute_rules()?;
            println!(
                "Substitute columns: starts with [{}] or contains [{}], split on [{}]",
                rules.prefixes.join(", "),
                rules.contains.join(", "),
                rules.separators.join(" "),
            );
        }
        ProfileKind::Diets => {
            println!("Text columns: {}", profile.text_columns().join(", "));
        }
    }
    if !profile.keywords().is_empty() {
        println!("Keywords: {}", profile.keywords().join(", "));
    }

    if !profile.fields.is_empty() {
        let mapping = profile.field_mapping()?;
        let mut table = Table::new();
        table.set_header(vec![header_cell("Field"), header_cell("Candidates")]);
        apply_table_style(&mut table);
        for (field, candidates) in mapping.iter() {
            table.add_row(vec![field.to_string(), candidates.join(", ")]);
        }
        println!("{table}");
    }
    println!();
    Ok(())
}
