//! Prompt text and the extraction schema.

use chrono::{DateTime, Months, Utc};
use serde_json::{Value, json};

/// Free-text search for the current and the next month.
pub fn search_prompt(now: DateTime<Utc>, region: &str, focus: &str) -> String {
    let current_month = now.format("%B %Y");
    let next_month = (now + Months::new(1)).format("%B %Y");

    format!(
        "Find a comprehensive list of upcoming public exhibitions, trade fairs, book fairs, \
         and art shows scheduled in {region} for {current_month} and {next_month}.\n\
         For each event, find the exact Name, Venue, Start Date, End Date, and a very brief description.\n\
         If specific times are available, include them.\n\
         {focus}"
    )
}

/// Turn search output into structured records.
pub fn extraction_prompt(raw_text: &str, region: &str) -> String {
    format!(
        "Analyze the following text which contains information about exhibitions in {region}.\n\
         Extract the events into a structured JSON array.\n\
         \n\
         Rules:\n\
         1. Dates MUST be in YYYY-MM-DD format.\n\
         2. If an end date is not specified, assume it is the same as the start date.\n\
         3. If exact times are missing, omit them.\n\
         4. Generate a unique ID for each event based on name and date.\n\
         5. Only include events that clearly have a name and date.\n\
         \n\
         Text to analyze:\n\
         ---\n\
         {raw_text}\n\
         ---"
    )
}

/// Response schema for the extraction step.
pub fn event_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "name": { "type": "STRING" },
                "description": { "type": "STRING" },
                "venue": { "type": "STRING" },
                "startDate": { "type": "STRING", "description": "YYYY-MM-DD" },
                "endDate": { "type": "STRING", "description": "YYYY-MM-DD" },
                "startTime": { "type": "STRING", "nullable": true },
                "endTime": { "type": "STRING", "nullable": true },
                "sourceUrl": { "type": "STRING", "nullable": true }
            },
            "required": ["id", "name", "description", "venue", "startDate", "endDate"]
        }
    })
}
