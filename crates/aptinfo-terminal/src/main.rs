use std::io::Write;
use std::process::ExitCode;

use aptinfo::catalog::{Catalog, CatalogEntry, EntryId};
use aptinfo::package::{Relation, Relationship, Template};
use aptinfo::relationship_resolver::{ResolverBuilder, ResolverFinalized};
use aptinfo::AptinfoOptions;

/// Relationship fields listed by `show`, in display order.
const RELATIONSHIP_FIELDS: [&str; 8] = [
	"Pre-Depends",
	"Depends",
	"Recommends",
	"Suggests",
	"Conflicts",
	"Replaces",
	"Breaks",
	"Provides",
];

type Handler = fn(&Context, &[String], &mut dyn Write) -> Result<(), Error>;

struct Command {
	name: &'static str,
	usage: &'static str,
	handle: Handler,
}

const COMMANDS: [Command; 8] = [
	Command { name: "compare", usage: COMPARE_USAGE, handle: command_compare },
	Command { name: "depends", usage: "depends <package-expression> <index-file>...\n\nShow dependencies of packages that matches the package expression", handle: command_depends },
	Command { name: "list", usage: "list <index-file>...\n\nList all packages", handle: command_list },
	Command { name: "raw", usage: "raw <package-expression> <index-file>...\n\nShow raw data of packages that matches the package expression", handle: command_raw },
	Command { name: "rdepends", usage: "rdepends <package-expression> <index-file>...\n\nShow packages having dependencies that matches the package expression", handle: command_rdepends },
	Command { name: "resolve", usage: "resolve <package-expression> <index-file>...\n\nRecursively resolve all dependencies of packages that matches the package expression", handle: command_resolve },
	Command { name: "show", usage: "show <package> <index-file>...\n\nShow information about a package", handle: command_show },
	Command { name: "size", usage: "size <package-expression> <index-file>...\n\nShow the download and installed size of all dependencies of packages that matches the package expression", handle: command_size },
];

const COMPARE_USAGE: &str = "\
compare <v1> <op> <v2>

Compare the two debian version strings <v1> and <v2> using the comparison operator <op>
  v1: [epoch:]upstream-version[-debian-revision]
  v2: [epoch:]upstream-version[-debian-revision]
  op: One of =, <<, >>, <=, >=";

/// Settings shared by every command.
struct Context {
	options: AptinfoOptions,
	/// Overrides the configured template when given on the command line.
	format: Option<Template>,
	json: bool,
}

impl Context {
	fn entry_template(&self) -> Template {
		self.format.clone().unwrap_or_else(|| Template::parse(self.options.entry_format()))
	}

	fn clause_template(&self) -> Template {
		self.format.clone().unwrap_or_else(|| Template::parse(self.options.clause_format()))
	}

	fn load_catalog(&self, files: &[String]) -> Result<Catalog, Error> {
		let catalog = Catalog::load(files, &self.options);
		if catalog.is_empty() {
			return Err(Error::NoEntries);
		}
		Ok(catalog)
	}

	fn print_entries<'a>(&self, out: &mut dyn Write, catalog: &'a Catalog, ids: impl IntoIterator<Item = EntryId>) -> Result<(), Error> {
		let entries: Vec<&'a CatalogEntry> = ids.into_iter().map(|id| &catalog[id]).collect();
		if self.json {
			serde_json::to_writer_pretty(&mut *out, &entries)?;
			writeln!(out)?;
		} else {
			let template = self.entry_template();
			for entry in entries {
				write!(out, "{}", template.render(entry))?;
			}
		}
		Ok(())
	}

	fn print_relationships(&self, out: &mut dyn Write, value: &str) -> Result<(), Error> {
		let template = self.clause_template();
		for relationship in Relationship::parse_list(value) {
			for clause in relationship.as_vec() {
				write!(out, "{}", template.render(clause))?;
			}
		}
		Ok(())
	}

	fn resolve(&self, catalog: &Catalog, expression: &str) -> Result<ResolverFinalized, Error> {
		let seeds = catalog.find_expression(expression)?;
		Ok(ResolverBuilder::new(catalog).options(&self.options).add_seeds(seeds).build().resolve())
	}
}

fn main() -> ExitCode {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",    "Show help");
		opts.optflag( "v", "verbose", "Increased vebosity");
		opts.optopt(  "c", "config",  "Read options from a JSON file", "PATH");
		opts.optopt(  "f", "format",  "Output template using %n %a %r %v %s %i %A", "TEMPLATE");
		opts.optflag( "",  "json",    "Print entries as JSON");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { eprintln!("Unable to parse options: {}", e); return ExitCode::FAILURE }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage(&brief()));
			return ExitCode::SUCCESS;
		}

		parsed_options
	};

	let level = if parsed_options.opt_present("v") { "debug" } else { "warn" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

	let config = match parsed_options.opt_str("c") {
		Some(path) => AptinfoOptions::load_from_path(path),
		None => AptinfoOptions::load_from_disk(),
	};
	let options = config.unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		AptinfoOptions::default()
	});

	let context = Context {
		options,
		format: parsed_options.opt_str("f").map(|f| Template::parse(&f)),
		json: parsed_options.opt_present("json"),
	};

	exit_code(run(&context, &parsed_options.free, &mut std::io::stdout().lock()))
}

/// Runs the command named by the first free argument, printing the command list when there is none.
fn run(context: &Context, free: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let Some(name) = free.first() else {
		writeln!(out, "{}", brief())?;
		return Ok(());
	};

	match COMMANDS.iter().find(|c| c.name == name.as_str()) {
		Some(command) => (command.handle)(context, &free[1..], out),
		None => Err(Error::UnknownCommand(name.clone())),
	}
}

fn exit_code(result: Result<(), Error>) -> ExitCode {
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("{}", e);
			ExitCode::FAILURE
		},
	}
}

fn brief() -> String {
	let mut s = "aptinfo <command> [<args>]\n\ncommands:\n".to_string();
	for command in &COMMANDS {
		s.push_str(&format!("  {}\n", command.name));
	}
	s
}

fn print_usage(out: &mut dyn Write, command: &str) -> Result<(), Error> {
	if let Some(c) = COMMANDS.iter().find(|c| c.name == command) {
		writeln!(out, "{}", c.usage)?;
	}
	Ok(())
}

fn command_compare(_context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [v1, op, v2] = args else { return print_usage(out, "compare") };

	let relation: Relation = op.parse().map_err(|_| Error::UnknownOperator(op.clone()))?;
	let valid = aptinfo::package::version::test(relation, v1, v2);
	writeln!(out, "{} {} {} [{}]", v1, op, v2, if valid { "OK" } else { "NOT OK" })?;
	Ok(())
}

fn command_list(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	if args.is_empty() {
		return print_usage(out, "list");
	}

	let catalog = context.load_catalog(args)?;
	context.print_entries(out, &catalog, catalog.iter().map(|(id, _)| id))
}

fn command_depends(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [expression, files @ ..] = args else { return print_usage(out, "depends") };
	if files.is_empty() {
		return print_usage(out, "depends");
	}

	let catalog = context.load_catalog(files)?;
	for id in catalog.find_expression(expression)? {
		if let Some(value) = catalog.read_field(&catalog[id], "Depends") {
			context.print_relationships(out, value)?;
		}
	}
	Ok(())
}

fn command_raw(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [expression, files @ ..] = args else { return print_usage(out, "raw") };
	if files.is_empty() {
		return print_usage(out, "raw");
	}

	let catalog = context.load_catalog(files)?;
	for (i, id) in catalog.find_expression(expression)?.into_iter().enumerate() {
		if i > 0 {
			writeln!(out)?;
		}
		let stanza = catalog.stanza(&catalog[id]);
		write!(out, "{}", stanza)?;
		if !stanza.ends_with('\n') {
			writeln!(out)?;
		}
	}
	Ok(())
}

fn command_rdepends(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [expression, files @ ..] = args else { return print_usage(out, "rdepends") };
	if files.is_empty() {
		return print_usage(out, "rdepends");
	}

	let catalog = context.load_catalog(files)?;
	for id in catalog.find_expression(expression)? {
		context.print_entries(out, &catalog, catalog.reverse_dependencies(id, "Depends"))?;
	}
	Ok(())
}

fn command_resolve(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [expression, files @ ..] = args else { return print_usage(out, "resolve") };
	if files.is_empty() {
		return print_usage(out, "resolve");
	}

	let catalog = context.load_catalog(files)?;
	let resolved = context.resolve(&catalog, expression)?;
	context.print_entries(out, &catalog, resolved.display_order())
}

fn command_show(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [package, files @ ..] = args else { return print_usage(out, "show") };
	if files.is_empty() {
		return print_usage(out, "show");
	}

	let catalog = context.load_catalog(files)?;
	let entry = &catalog[catalog.find_package(package)?];
	for field in RELATIONSHIP_FIELDS {
		if let Some(value) = catalog.read_field(entry, field) {
			writeln!(out, "# {}:", field)?;
			context.print_relationships(out, value)?;
		}
	}
	Ok(())
}

fn command_size(context: &Context, args: &[String], out: &mut dyn Write) -> Result<(), Error> {
	let [expression, files @ ..] = args else { return print_usage(out, "size") };
	if files.is_empty() {
		return print_usage(out, "size");
	}

	let catalog = context.load_catalog(files)?;
	let resolved = context.resolve(&catalog, expression)?;
	let entries: Vec<_> = resolved.display_order().map(|id| &catalog[id]).collect();
	let size: u64 = entries.iter().map(|e| e.size()).sum();
	let installed_size: u64 = entries.iter().map(|e| e.installed_size()).sum();

	if context.json {
		let report = serde_json::json!({
			"entries": entries,
			"size": size,
			"installed_size": installed_size,
		});
		serde_json::to_writer_pretty(&mut *out, &report)?;
		writeln!(out)?;
	} else {
		let template = context.format.clone().unwrap_or_else(|| Template::parse("%A %s %i\n"));
		for entry in &entries {
			write!(out, "{}", template.render(*entry))?;
		}
		writeln!(out, "Total: {} {}", size, installed_size)?;
	}
	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Aptinfo(#[from] aptinfo::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Unknown command {0}")]
	UnknownCommand(String),
	#[error("Unknown comparison operator {0}")]
	UnknownOperator(String),
	#[error("No entries found in package file(s)")]
	NoEntries,
}

#[cfg(test)]
mod tests {
	use super::*;
	use aptinfo_test_utils::IndexDir;

	const APP: &str = "\
Package: app
Version: 1.0
Pre-Depends: dpkg
Depends: libc6 (>= 2.34)
Recommends: mailx | mutt
Size: 100
Installed-Size: 10
";

	const LIBC6: &str = "\
Package: libc6
Version: 2.36
Architecture: amd64
Size: 1000
Installed-Size: 200
";

	fn context() -> Context {
		Context { options: AptinfoOptions::default(), format: None, json: false }
	}

	/// Writes `text` to a temporary index file, the directory has to be kept alive while it is read.
	fn index(text: &str) -> (IndexDir, String) {
		let dir = IndexDir::new().unwrap();
		let path = dir.write_index("Packages", text).unwrap();
		(dir, path.display().to_string())
	}

	fn archive() -> (IndexDir, String) {
		index(&format!("{}\n{}", APP, LIBC6))
	}

	fn call(context: &Context, handle: Handler, args: &[&str]) -> (Result<(), Error>, String) {
		let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
		let mut out = Vec::new();
		let result = handle(context, &args, &mut out);
		(result, String::from_utf8(out).unwrap())
	}

	#[test]
	fn compare_reports_outcome() {
		let (result, out) = call(&context(), command_compare, &["1.0~rc1", "<<", "1.0"]);
		result.unwrap();
		assert_eq!(out, "1.0~rc1 << 1.0 [OK]\n");

		let (result, out) = call(&context(), command_compare, &["2", ">>", "10"]);
		result.unwrap();
		assert_eq!(out, "2 >> 10 [NOT OK]\n");
	}

	#[test]
	fn compare_unknown_operator_fails() {
		let (result, _) = call(&context(), command_compare, &["1", "=>", "2"]);
		assert!(matches!(result, Err(Error::UnknownOperator(op)) if op == "=>"));
	}

	#[test]
	fn missing_arguments_print_usage() {
		let (result, out) = call(&context(), command_resolve, &["app"]);
		result.unwrap();
		assert!(out.starts_with("resolve <package-expression>"));
	}

	#[test]
	fn empty_index_has_no_entries() {
		let (_dir, path) = index("");
		let (result, _) = call(&context(), command_list, &[&path]);
		assert!(matches!(result, Err(Error::NoEntries)));
	}

	#[test]
	fn named_package_must_exist() {
		let (_dir, path) = archive();
		let (result, _) = call(&context(), command_resolve, &["missing", &path]);
		assert!(matches!(result, Err(Error::Aptinfo(aptinfo::Error::NotFound(name))) if name == "missing"));

		let (result, _) = call(&context(), command_show, &["libc6 (<< 2.0)", &path]);
		assert!(matches!(result, Err(Error::Aptinfo(aptinfo::Error::NotFound(_)))));
	}

	#[test]
	fn list_prints_every_entry() {
		let (_dir, path) = archive();
		let (result, out) = call(&context(), command_list, &[&path]);
		result.unwrap();
		assert_eq!(out, "app (= 1.0)\nlibc6:amd64 (= 2.36)\n");
	}

	#[test]
	fn list_as_json() {
		let (_dir, path) = archive();
		let context = Context { json: true, ..context() };
		let (result, out) = call(&context, command_list, &[&path]);
		result.unwrap();
		let value: serde_json::Value = serde_json::from_str(&out).unwrap();
		assert_eq!(value[0]["name"], "app");
		assert_eq!(value[1]["installed_size"], 200);
	}

	#[test]
	fn show_lists_fields_with_headers() {
		let (_dir, path) = archive();
		let (result, out) = call(&context(), command_show, &["app", &path]);
		result.unwrap();
		assert_eq!(out, "# Pre-Depends:\ndpkg\n# Depends:\nlibc6 (>= 2.34)\n# Recommends:\nmailx\nmutt\n");
	}

	#[test]
	fn raw_separates_stanzas_with_a_blank_line() {
		let (_dir, path) = archive();
		let (result, out) = call(&context(), command_raw, &["app, libc6", &path]);
		result.unwrap();
		assert_eq!(out, format!("{}\n{}", APP, LIBC6));
	}

	#[test]
	fn size_prints_totals() {
		let (_dir, path) = archive();
		let (result, out) = call(&context(), command_size, &["app", &path]);
		result.unwrap();
		assert_eq!(out, "libc6:amd64 (= 2.36) 1000 200\napp (= 1.0) 100 10\nTotal: 1100 210\n");
	}

	#[test]
	fn format_option_overrides_template() {
		let (_dir, path) = archive();
		let context = Context { format: Some(Template::parse("%n %v\n")), ..context() };
		let (result, out) = call(&context, command_resolve, &["app", &path]);
		result.unwrap();
		assert_eq!(out, "libc6 2.36\napp 1.0\n");
	}

	#[test]
	fn unknown_command_exits_with_failure() {
		let mut out = Vec::new();
		let result = run(&context(), &["frobnicate".to_string()], &mut out);
		assert!(matches!(result, Err(Error::UnknownCommand(ref name)) if name == "frobnicate"));
		assert_eq!(exit_code(result), ExitCode::FAILURE);
	}

	#[test]
	fn known_command_exits_with_success() {
		let mut out = Vec::new();
		let args = ["compare", "1", "=", "1"].map(String::from);
		assert_eq!(exit_code(run(&context(), &args, &mut out)), ExitCode::SUCCESS);
		assert_eq!(String::from_utf8(out).unwrap(), "1 = 1 [OK]\n");
	}
}
