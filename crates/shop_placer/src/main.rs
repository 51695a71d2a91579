//! shop_placer CLI: populate a shop shelf from product data.
//!
//! Run with: cargo run -p shop_placer -- place --seed 42

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shop_core::category::{categorize, SHOP_CATEGORY_RULES};
use shop_core::stage::PrimKind;
use shop_core::verify::DataReport;
use shop_core::{
    ensure_hierarchy, load_product_table, place_all, randomize_rotations, MemoryStage,
    PlacementSummary, PlacerConfig, ProductTable,
};
use shop_math::XformOp;

#[derive(Parser)]
#[command(
    name = "shop_placer",
    version,
    about = "Place shop products on shelves from a product data file"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (defaults apply for anything it leaves out)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Product data JSON file, overrides the config
    #[arg(long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Randomize a few rotations and place every product on an in-memory stage
    Place {
        #[command(flatten)]
        random: RandomArgs,

        /// Place every product static
        #[arg(long)]
        no_physics: bool,

        /// Skip collision shapes on rigid bodies
        #[arg(long)]
        no_collision: bool,
    },

    /// Print the product data with randomized rotations as JSON
    Randomize {
        #[command(flatten)]
        random: RandomArgs,
    },

    /// Count products per category
    Count,

    /// List physics-enabled and static products
    Physics,

    /// Check structure, positions and asset references
    Verify,
}

#[derive(Args)]
struct RandomArgs {
    /// Number of products to randomize
    #[arg(long)]
    count: Option<usize>,

    /// Seed for reproducible randomization
    #[arg(long)]
    seed: Option<u64>,
}

impl RandomArgs {
    fn apply(&self, config: &mut PlacerConfig) {
        if let Some(count) = self.count {
            config.randomize_count = count;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PlacerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlacerConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.product_data = data.clone();
    }
    log::debug!("Using config: {:?}", config);

    match &cli.command {
        Commands::Place {
            random,
            no_physics,
            no_collision,
        } => {
            random.apply(&mut config);
            if *no_physics {
                config.physics_for_all = false;
            }
            if *no_collision {
                config.force_collision = false;
            }
            run_place(&config)
        }
        Commands::Randomize { random } => {
            random.apply(&mut config);
            run_randomize(&config)
        }
        Commands::Count => run_count(&config),
        Commands::Physics => run_physics(&config),
        Commands::Verify => run_verify(&config),
    }
}

fn load_table(config: &PlacerConfig) -> Result<ProductTable> {
    load_product_table(&config.product_data).with_context(|| {
        format!(
            "Failed to load product data from {}",
            config.product_data.display()
        )
    })
}

fn make_rng(config: &PlacerConfig) -> StdRng {
    match config.seed {
        Some(seed) => {
            log::info!("Randomizing with seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

fn outcome_line(summary: &PlacementSummary) -> String {
    format!(
        "Successfully placed {} out of {} products",
        summary.success_count(),
        summary.total
    )
}

fn run_place(config: &PlacerConfig) -> Result<()> {
    let table = load_table(config)?;
    let randomized = randomize_rotations(&table, config.randomize_count, &mut make_rng(config));

    let mut stage = MemoryStage::new(config.stage_root.clone());
    ensure_hierarchy(SHOP_CATEGORY_RULES, &mut stage).context("Failed to create product hierarchy")?;

    let summary = place_all(
        &randomized,
        SHOP_CATEGORY_RULES,
        &config.placement_options(),
        &mut stage,
    );

    println!("\n=== Stage: {} ===", stage.root);
    println!("Scopes: {}", stage.scope_count());
    println!("Products: {}", stage.product_count());
    println!("Rigid bodies: {}", stage.dynamic_count());

    println!("\n--- Products ---");
    for prim in stage.products() {
        let PrimKind::Product {
            xform_ops,
            rigid_body,
            ..
        } = &prim.kind
        else {
            continue;
        };

        let ops: Vec<String> = xform_ops.iter().map(format_op).collect();
        let status = if rigid_body.is_some() { "physics" } else { "static" };
        println!("  {} [{}]", prim.path, status);
        println!("       {}", ops.join(", "));
    }

    let bounds = stage.world_bounds();
    if !bounds.is_empty() {
        println!("\n--- World Bounds ---");
        println!("  X: {}", bounds.x);
        println!("  Y: {}", bounds.y);
        println!("  Z: {}", bounds.z);
    }

    println!("\n{}", outcome_line(&summary));
    for failure in &summary.failures {
        println!("  FAILED {}", failure);
    }

    if summary.failure_count() > 0 {
        log::warn!(
            "{} of {} products were skipped",
            summary.failure_count(),
            summary.total
        );
    }
    log::info!("{} under {}", outcome_line(&summary), stage.root);

    if !summary.is_success() {
        bail!("No products were placed");
    }
    Ok(())
}

fn format_op(op: &XformOp) -> String {
    match op {
        XformOp::Translate(t) => format!("translate ({:.3}, {:.3}, {:.3})", t.x, t.y, t.z),
        XformOp::RotateZYX(r) => format!("rotateZYX ({:.1}, {:.1}, {:.1})", r.x, r.y, r.z),
        XformOp::Orient(q) => format!("orient ({:.4}, {:.4}, {:.4}, {:.4})", q.w, q.x, q.y, q.z),
        XformOp::Scale(s) => format!("scale ({:.3}, {:.3}, {:.3})", s.x, s.y, s.z),
    }
}

fn run_randomize(config: &PlacerConfig) -> Result<()> {
    let table = load_table(config)?;
    let randomized = randomize_rotations(&table, config.randomize_count, &mut make_rng(config));

    let json = serde_json::to_string_pretty(&randomized).context("Failed to serialize product data")?;
    println!("{}", json);
    Ok(())
}

fn run_count(config: &PlacerConfig) -> Result<()> {
    let table = load_table(config)?;
    let categorization = categorize(&table, SHOP_CATEGORY_RULES);

    println!("Total products found: {}", table.len());

    println!("\nAll products:");
    for (i, (id, record)) in table.iter().enumerate() {
        match &record.description {
            Some(description) => println!("{:2}. {} - {}", i + 1, id, description),
            None => println!("{:2}. {}", i + 1, id),
        }
    }

    println!("\nProduct categories:");
    for (rule, ids) in categorization.non_empty() {
        println!(
            "  {:18} {:2} ({}/{})",
            rule.label,
            ids.len(),
            rule.shelf_level,
            rule.category
        );
    }
    if !categorization.unresolved.is_empty() {
        println!("  {:18} {:2}", "Unresolved", categorization.unresolved.len());
        for id in &categorization.unresolved {
            println!("    - {}", id);
        }
    }
    Ok(())
}

fn run_physics(config: &PlacerConfig) -> Result<()> {
    let table = load_table(config)?;
    let report = DataReport::build(&table, SHOP_CATEGORY_RULES, config);
    let physics = &report.physics;

    println!("=== PHYSICS ANALYSIS ===");
    println!("\nPHYSICS ENABLED ({} products):", physics.enabled.len());
    for (i, id) in physics.enabled.iter().enumerate() {
        println!("{:2}. {}", i + 1, id);
    }

    println!("\nPHYSICS DISABLED - STATIC ({} products):", physics.disabled.len());
    for (i, id) in physics.disabled.iter().enumerate() {
        println!("{:2}. {}", i + 1, id);
    }

    println!(
        "\nTOTAL: {} physics + {} static = {} products",
        physics.enabled.len(),
        physics.disabled.len(),
        physics.total()
    );

    println!("\n=== BY CATEGORY ===");
    for (rule, ids) in report.categories.non_empty() {
        let dynamic = ids
            .iter()
            .filter(|id| table.get(id).is_some_and(|r| r.physics_enabled))
            .count();
        let status = match dynamic {
            0 => "Static (no physics)".to_string(),
            n if n == ids.len() => "Physics enabled".to_string(),
            n => format!("Mixed ({} of {} with physics)", n, ids.len()),
        };
        println!("{:18} ({} items): {}", rule.label, ids.len(), status);
    }
    Ok(())
}

fn run_verify(config: &PlacerConfig) -> Result<()> {
    let table = load_table(config)?;
    let report = DataReport::build(&table, SHOP_CATEGORY_RULES, config);

    println!("=== PRODUCT DATA VERIFICATION ===");
    println!("Loaded {} products", report.product_count);
    if report.structure.is_empty() {
        println!("All product data structure checks passed");
        println!("  - Physics enabled: {} products", report.physics.enabled.len());
        println!("  - Static objects: {} products", report.physics.disabled.len());
    } else {
        println!("Found {} data structure issues:", report.structure.len());
        for issue in &report.structure {
            println!("  - {}", issue);
        }
    }

    println!("\n=== PRODUCT CATEGORIZATION ===");
    for (rule, ids) in report.categories.non_empty() {
        println!("{:18}: {} items - {}", rule.label, ids.len(), rule.shelf_level);
    }
    for id in &report.categories.unresolved {
        println!("Unresolved: {}", id);
    }
    println!(
        "\nTotal products categorized: {}",
        report.categories.resolved_count()
    );

    println!("\n=== POSITION VALIDATION ===");
    if report.positions.is_empty() {
        println!("All product positions are within expected shop bounds");
    } else {
        println!("Found {} position issues:", report.positions.len());
        for issue in &report.positions {
            println!("  - {}", issue);
        }
    }
    println!("  - Lower shelf items: {}", report.split.lower.len());
    println!("  - Upper shelf items: {}", report.split.upper.len());

    println!("\n=== ASSET URL VALIDATION ===");
    if report.assets.is_empty() {
        println!("All asset URLs have valid format");
    } else {
        println!("Found {} asset issues:", report.assets.len());
        for issue in &report.assets {
            println!("  - {}", issue);
        }
    }
    println!("Asset type distribution:");
    for (kind, count) in &report.asset_kinds {
        println!("  - {}: {} products", kind.label(), count);
    }

    if !report.is_valid() {
        bail!("Product data has {} structure issues", report.structure.len());
    }
    Ok(())
}
