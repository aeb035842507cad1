// AI assistance over the user's own completion key: key check and summary
// rewrite. Provider details stay behind `CompletionService`.

pub mod handlers;
