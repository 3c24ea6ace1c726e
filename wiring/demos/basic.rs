//! Basic example of the Wiring container.

use std::any::Any;

use tracing_subscriber::EnvFilter;
use wiring::prelude::*;

// === Define your types ===

#[derive(Debug)]
struct Database {
    url: String,
    pool_size: i64,
}

impl Object for Database {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "url" => Some(Value::from(self.url.as_str())),
            "pool_size" => Some(Value::Int(self.pool_size)),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct UserRepository {
    database: Value,
    table: String,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        let url = self
            .database
            .downcast_ref::<Database>()
            .map(|db| db.url.as_str())
            .unwrap_or("<unknown>");
        format!("SELECT * FROM {} WHERE id = {id} -- on {url}", self.table)
    }
}

impl Object for UserRepository {
    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "database" => Some(self.database.clone()),
            "table" => Some(Value::from(self.table.as_str())),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wiring=debug")),
        )
        .init();

    // Repositories live in their own container and reach the
    // database declared one level up
    let repositories = Container::builder()
        .named("Repositories")
        .value("table", "users")
        .link("database", this().up(1)?.attr("database"))
        .factory("users", ["database", "table"], |args| {
            Ok(Value::object(UserRepository {
                database: args.get("database")?.clone(),
                table: args.get("table")?.as_str().unwrap_or_default().to_string(),
            }))
        })
        .build()?;

    let container = Container::builder()
        .named("App")
        .value(
            "settings",
            Value::map([
                ("database_url", Value::from("postgres://localhost/myapp")),
                ("pool", Value::map([("size", 8)])),
            ]),
        )
        .link("url", this().attr("settings").item("database_url"))
        .link("pool_size", this().attr("settings").item("pool").item("size"))
        .factory("database", ["url", "pool_size"], |args| {
            Ok(Value::object(Database {
                url: args.get("url")?.as_str().unwrap_or_default().to_string(),
                pool_size: args.get("pool_size")?.as_int().unwrap_or(1),
            }))
        })
        .nested("repositories", repositories)
        .link("pool_size_check", this().attr("database").attr("pool_size"))
        .build()?;

    println!("✅ Container built successfully!");
    println!("{container:?}");

    let pool_size = container.resolve("pool_size_check")?;
    println!("📋 Pool size: {pool_size:?}");

    // One root, several lookups sharing the same sub-container scope
    let root = container.root();
    let users = root.resolve_path(&["repositories", "users"])?;
    if let Some(repo) = users.downcast_ref::<UserRepository>() {
        println!("👤 {}", repo.find_user(42));
    }

    // Override the settings without touching the original definition
    let testing = container
        .extend()
        .named("TestApp")
        .value(
            "settings",
            Value::map([
                ("database_url", Value::from("sqlite::memory:")),
                ("pool", Value::map([("size", 1)])),
            ]),
        )
        .build()?;

    println!("🧪 Test url: {:?}", testing.resolve("url")?);
    println!("🏭 Prod url: {:?}", container.resolve("url")?);

    // Cycles are reported, not overflowed
    let broken = Container::builder()
        .named("Broken")
        .link("foo", this().attr("bar"))
        .link("bar", this().attr("foo"))
        .build()?;

    if let Err(WiringError::CircularReference(cycle)) = broken.resolve("foo") {
        println!("🔁 {cycle}: {}", cycle.render_chain());
    }

    println!("\n🎉 Everything works!");
    Ok(())
}
