//! Example: Load product data and print the placement plan of every product.
//!
//! Run with: cargo run --example plan_products -- assets/product_data.json

use std::env;

use shop_core::category::SHOP_CATEGORY_RULES;
use shop_core::pipeline::plan_all;
use shop_core::{load_product_table, PlacementOptions, RotationDescriptor};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: plan_products <path-to-product-data>");
        println!("\nExample:");
        println!("  cargo run --example plan_products -- assets/product_data.json");
        return;
    }

    let path = &args[1];
    println!("Loading product data: {}", path);

    let table = match load_product_table(path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error loading product data: {}", e);
            return;
        }
    };

    println!("\n=== Products: {} ===", table.len());
    println!("Physics enabled: {}", table.physics_count());

    println!("\n--- Plans ---");
    for (id, planned) in plan_all(&table, SHOP_CATEGORY_RULES, &PlacementOptions::default()) {
        match planned {
            Ok(plan) => {
                let rotation = match plan.rotation {
                    RotationDescriptor::EulerZyx(e) => {
                        format!("rotateZYX ({:.1}, {:.1}, {:.1})", e.x, e.y, e.z)
                    }
                    RotationDescriptor::Quaternion(q) => {
                        format!("orient ({:.3}, {:.3}, {:.3}, {:.3})", q.w, q.x, q.y, q.z)
                    }
                };
                println!("  {}", plan.scene_path);
                println!(
                    "       at ({:.2}, {:.2}, {:.2}) {}",
                    plan.translate.x, plan.translate.y, plan.translate.z, rotation
                );
                if let Some(physics) = plan.physics {
                    println!(
                        "       rigid body, velocity {:.4}, angular {:.4}",
                        physics.velocity.length(),
                        physics.angular_velocity.length()
                    );
                }
            }
            Err(e) => println!("  {} skipped: {}", id, e),
        }
    }
}
