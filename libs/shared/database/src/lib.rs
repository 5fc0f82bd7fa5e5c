pub mod supabase;

pub use supabase::{eq, in_list, SupabaseClient};
