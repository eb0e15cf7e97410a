// Job description generation: form validation, prompt building, persistence,
// and the pipeline tying them to the generation client.
// All generation calls go through llm_client, never direct Gemini calls here.

pub mod download;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod validation;
