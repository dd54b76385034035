mod azure_store;
mod memory_store;
mod store_factory;
mod supabase_store;

pub use azure_store::AzureStagingStore;
pub use memory_store::InMemoryStagingStore;
pub use store_factory::StagingStoreFactory;
pub use supabase_store::SupabaseStagingStore;
