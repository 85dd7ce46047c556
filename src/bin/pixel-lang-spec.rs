//! pixel-lang-spec - generates specs/*.md from the live handler registry.
//!
//! Reads every registered handler family and writes one markdown reference
//! file per control code into `specs/handlers/`, plus an `INDEX.md`.
//!
//! # Usage
//!
//! ```bash
//! # From the crate root:
//! cargo run --bin pixel-lang-spec
//!
//! # Or with a custom output directory:
//! cargo run --bin pixel-lang-spec -- path/to/output
//! ```

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use pixel_lang::vm::{reference_card, Family, Handler, HandlerRegistry, MetaLayout};

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("specs"));

    let handler_dir = out_dir.join("handlers");
    fs::create_dir_all(&handler_dir)
        .with_context(|| format!("Failed to create {}", handler_dir.display()))?;

    let registry = HandlerRegistry::standard()?;
    let handlers = registry.handlers();

    // Write per-family files
    for (control_code, family) in registry.families() {
        let members: Vec<&dyn Handler> = handlers
            .iter()
            .copied()
            .filter(|h| h.control_code() == control_code)
            .collect();
        let path = handler_dir.join(family_filename(control_code));
        let content = render_family(control_code, family, &members)?;
        fs::write(&path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  wrote {}", path.display());
    }

    // Write index
    let index_path = out_dir.join("INDEX.md");
    let index_content = render_index(registry, &handlers)?;
    fs::write(&index_path, &index_content)
        .with_context(|| format!("Failed to write {}", index_path.display()))?;
    println!("  wrote {}", index_path.display());

    println!();
    println!(
        "Done. {} families, {} handlers.",
        registry.families().len(),
        handlers.len()
    );
    Ok(())
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn family_filename(control_code: u8) -> String {
    format!("CC_{:X}.md", control_code)
}

fn family_name(family: Family) -> &'static str {
    match family {
        Family::Plain => "plain",
        Family::Meta(MetaLayout::Register) => "register meta",
        Family::Meta(MetaLayout::Generic) => "generic meta",
    }
}

fn render_index(registry: &HandlerRegistry, handlers: &[&dyn Handler]) -> Result<String> {
    let mut s = String::new();

    writeln!(s, "# pixel_lang Instruction Reference")?;
    writeln!(s)?;
    writeln!(s, "Auto-generated from the live handler registry by `pixel-lang-spec`.")?;
    writeln!(s)?;
    writeln!(s, "**Total: {} handlers** across {} control codes", handlers.len(), registry.families().len())?;
    writeln!(s)?;
    writeln!(s, "## Control Codes")?;
    writeln!(s)?;
    writeln!(s, "| CC | Family | Handlers | Spec |")?;
    writeln!(s, "|----|--------|----------|------|")?;

    for (control_code, family) in registry.families() {
        let names: Vec<&str> = handlers
            .iter()
            .filter(|h| h.control_code() == control_code)
            .map(|h| h.mnemonic())
            .collect();
        writeln!(
            s,
            "| 0x{:X} | {} | {} | [spec](handlers/{}) |",
            control_code,
            family_name(family),
            names.join(", "),
            family_filename(control_code)
        )?;
    }

    writeln!(s)?;
    writeln!(s, "## Word Layouts")?;
    writeln!(s)?;
    writeln!(s, "Every word is 24 bits. The top nibble selects the family:")?;
    writeln!(s)?;
    writeln!(s, "| Family | Layout |")?;
    writeln!(s, "|--------|--------|")?;
    writeln!(s, "| plain | `[CC:4][ARG:20]` |")?;
    writeln!(s, "| register meta | `[CC:4][MC:3][REG:3][OPT:2][ARG:12]` |")?;
    writeln!(s, "| generic meta | `[CC:4][MC:3][ARG:17]` |")?;
    Ok(s)
}

fn render_family(control_code: u8, family: Family, handlers: &[&dyn Handler]) -> Result<String> {
    let mut s = String::new();

    writeln!(s, "# Control Code 0x{:X} ({})", control_code, family_name(family))?;
    writeln!(s)?;

    if let Family::Meta(_) = family {
        writeln!(s, "| MC | Mnemonic | Glyph | Description |")?;
        writeln!(s, "|----|----------|-------|-------------|")?;
        for h in handlers {
            writeln!(
                s,
                "| {} | `{}` | {} | {} |",
                h.meta_command().unwrap_or(0),
                h.mnemonic(),
                h.glyph(),
                h.description()
            )?;
        }
        writeln!(s)?;
    }

    for h in handlers {
        writeln!(s, "## {}", h.mnemonic())?;
        writeln!(s)?;
        writeln!(s, "```text")?;
        write!(s, "{}", reference_card(*h))?;
        writeln!(s, "```")?;
        writeln!(s)?;
    }
    Ok(s)
}
