mod theme;

pub use theme::{print_banner, print_error, print_success, print_warning, shelfsearch_theme};
