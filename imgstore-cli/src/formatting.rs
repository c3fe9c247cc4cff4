use console::style;

/// Prints a short success line, the way every subcommand reports its result.
pub fn success(message: impl std::fmt::Display) {
    println!("{} {message}", style("OK").green().bold());
}
