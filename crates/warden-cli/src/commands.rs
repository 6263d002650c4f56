use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use warden_access::{parse_reader_list, AccessError, AccessService, NewObject};
use warden_store::FsBlobStore;
use warden_types::{validate_identity, ObjectId};

use crate::cli::*;
use crate::config::WardenConfig;

/// Everything a command needs: who is acting, against which store, and how to print.
struct Session {
    user: String,
    service: AccessService,
    format: OutputFormat,
}

impl Session {
    fn open(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = WardenConfig::load(cli.config.as_deref())?;
        if let Some(root) = &cli.root {
            config.store.root = root.clone();
        }

        let user = cli.user.clone().ok_or_else(|| {
            AccessError::InvalidInput("no acting user: pass --user or set WARDEN_USER".into())
        })?;
        validate_identity(&user, config.access.max_identity_len).map_err(AccessError::from)?;

        let root = config.store.root.clone();
        let store = FsBlobStore::open(config.store)
            .with_context(|| format!("opening store at {}", root.display()))?;
        tracing::debug!(user = %user, root = %root.display(), "session opened");

        Ok(Self {
            user,
            service: AccessService::with_config(Arc::new(store), config.access),
            format: cli.format,
        })
    }

    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

fn parse_id(raw: &str) -> anyhow::Result<ObjectId> {
    Ok(ObjectId::parse(raw).map_err(AccessError::from)?)
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let session = Session::open(&cli)?;
    match cli.command {
        Command::Upload(args) => cmd_upload(&session, args),
        Command::List => cmd_list(&session),
        Command::Meta(args) => cmd_meta(&session, args),
        Command::Download(args) => cmd_download(&session, args),
        Command::Replace(args) => cmd_replace(&session, args),
        Command::Rename(args) => cmd_rename(&session, args),
        Command::Readers(args) => cmd_readers(&session, args),
        Command::SetReaders(args) => cmd_set_readers(&session, args),
        Command::AddReader(args) => cmd_add_reader(&session, args),
        Command::RemoveReader(args) => cmd_remove_reader(&session, args),
        Command::Delete(args) => cmd_delete(&session, args),
    }
}

/// Process exit code for a failed command.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AccessError>() {
        Some(AccessError::NotFound(_)) => 2,
        Some(AccessError::Forbidden { .. }) => 3,
        Some(AccessError::InvalidInput(_)) => 4,
        _ => 1,
    }
}

fn cmd_upload(s: &Session, args: UploadArgs) -> anyhow::Result<()> {
    let content = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let readers = match &args.readers_json {
        Some(raw) => parse_reader_list(raw)?,
        None => args.readers,
    };
    let object = NewObject::new(args.name.clone(), content).with_readers(readers);
    let id = s.service.create_object(&s.user, object)?;

    if s.json() {
        return print_json(&json!({ "id": id, "owner": s.user, "name": args.name }));
    }
    println!("{} Created {} ({})", "✓".green().bold(), id.to_string().yellow(), args.name.bold());
    Ok(())
}

fn cmd_list(s: &Session) -> anyhow::Result<()> {
    let objects = s.service.list_accessible(&s.user)?;
    if s.json() {
        return print_json(&serde_json::to_value(&objects)?);
    }
    if objects.is_empty() {
        println!("No objects available.");
    }
    for o in &objects {
        println!("{}  {}  (owner: {})", o.id.to_string().yellow(), o.name.bold(), o.owner.cyan());
    }
    Ok(())
}

fn cmd_meta(s: &Session, args: IdArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let meta = s.service.read_meta(&s.user, &id)?;
    if s.json() {
        return print_json(&serde_json::to_value(&meta)?);
    }
    println!("Object {}", meta.id.to_string().yellow().bold());
    println!("  Name:    {}", meta.name.bold());
    println!("  Owner:   {}", meta.owner.cyan());
    println!("  Readers: {}", meta.readers.iter().cloned().collect::<Vec<_>>().join(", "));
    if !meta.extra.is_empty() {
        println!("  Extra:   {}", serde_json::to_string(&meta.extra)?);
    }
    Ok(())
}

fn cmd_download(s: &Session, args: DownloadArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let content = s.service.read_content(&s.user, &id)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("writing {}", path.display()))?;
            if s.json() {
                return print_json(&json!({ "id": id, "bytes": content.len(), "output": path }));
            }
            println!("{} Wrote {} bytes to {}", "✓".green(), content.len(), path.display());
        }
        None if s.json() => {
            print_json(&json!({
                "id": id,
                "bytes": content.len(),
                "data": String::from_utf8_lossy(&content),
            }))?;
        }
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&content)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn cmd_replace(s: &Session, args: ReplaceArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let content = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    s.service.update_content(&s.user, &id, &content)?;
    if s.json() {
        return print_json(&json!({ "updated": id, "bytes": content.len() }));
    }
    println!("{} Replaced content of {}", "✓".green(), id.to_string().yellow());
    Ok(())
}

fn cmd_rename(s: &Session, args: RenameArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    s.service.rename(&s.user, &id, &args.name)?;
    if s.json() {
        return print_json(&json!({ "updated": id, "name": args.name }));
    }
    println!("{} Renamed {} to {}", "✓".green(), id.to_string().yellow(), args.name.bold());
    Ok(())
}

fn cmd_readers(s: &Session, args: IdArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let readers = s.service.readers(&s.user, &id)?;
    if s.json() {
        return print_json(&json!({ "id": id, "readers": readers }));
    }
    println!("Readers of {}: {}", id.to_string().yellow(), readers.into_iter().collect::<Vec<_>>().join(", "));
    Ok(())
}

fn cmd_set_readers(s: &Session, args: SetReadersArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let users = match &args.json {
        Some(raw) => parse_reader_list(raw)?,
        None => args.users,
    };
    s.service.set_readers(&s.user, &id, users)?;
    let readers = s.service.readers(&s.user, &id)?;
    if s.json() {
        return print_json(&json!({ "updated": id, "readers": readers }));
    }
    println!("{} Readers of {} set to {}", "✓".green(), id.to_string().yellow(), readers.into_iter().collect::<Vec<_>>().join(", "));
    Ok(())
}

fn cmd_add_reader(s: &Session, args: ReaderArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    s.service.add_reader(&s.user, &id, &args.target)?;
    if s.json() {
        return print_json(&json!({ "id": id, "added": args.target }));
    }
    println!("{} Added reader {} to {}", "✓".green(), args.target.cyan(), id.to_string().yellow());
    Ok(())
}

fn cmd_remove_reader(s: &Session, args: ReaderArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    s.service.remove_reader(&s.user, &id, &args.target)?;
    if s.json() {
        return print_json(&json!({ "id": id, "removed": args.target }));
    }
    println!("{} Removed reader {} from {}", "✓".green(), args.target.cyan(), id.to_string().yellow());
    Ok(())
}

fn cmd_delete(s: &Session, args: IdArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    s.service.delete_object(&s.user, &id)?;
    if s.json() {
        return print_json(&json!({ "deleted": id }));
    }
    println!("{} Deleted {}", "✓".green(), id.to_string().yellow());
    Ok(())
}
