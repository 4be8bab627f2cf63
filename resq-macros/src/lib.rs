mod job;
use job::*;

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

/// Generates impl for `resq::Job` from an inherent `async fn perform`.
///
/// Example usage:
/// ```ignore
/// #[derive(Serialize, Deserialize, resq::Job)]
/// #[resq(class = "Archive", queue = "file_serve", error = ArchiveError)]
/// pub struct ArchiveJob {
///     path: String,
/// }
///
/// impl ArchiveJob {
///     async fn perform(&self) -> Result<(), ArchiveError> {
///         Ok(())
///     }
/// }
/// ```
///
/// `class` defaults to the struct name, `queue` to the trait default and
/// `error` to a `JobError` type in scope.
#[proc_macro_error]
#[proc_macro_derive(Job, attributes(resq))]
pub fn derive_job(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_derive_job(input).into()
}
