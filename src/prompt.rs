//! Fixed instruction prompt assembly.
//!
//! The prompt wording is part of the external contract: changing it changes
//! model behavior, so the template is versioned and snapshot-tested as a
//! unit rather than treated as incidental formatting.

use crate::error::Result;
use crate::schema::AnalysisBundle;

/// Bump when the template wording changes.
pub const PROMPT_VERSION: &str = "1";

/// System message sent alongside every user prompt.
pub const SYSTEM_MESSAGE: &str = "You are a financial analysis expert. \
     Provide answer of given question based on the provided financial data.";

const PREAMBLE: &str = "\
You are a financial assistant tasked with answering quantitative questions based on financial documents.

Below is the financial context, a specific question, structured table data, and pre-parsed numeric field values.

Your job is to extract the correct numerical answer to the question by following these structured steps internally.
**You should only return the final answer - no explanation or reasoning is required.**";

const INSTRUCTIONS: &str = "\
**Instructions to Solve Internally**:

1. Carefully read and understand the financial question.
2. Identify the relevant numeric fields from the table or pre-parsed values.
3. Perform any required calculations such as:
   - Year-over-year difference: `value_year_2 - value_year_1`
   - Percentage change: `(value_year_2 - value_year_1) / value_year_1 * 100`
   - Ratios or additions/subtractions across fields.
4. Always prefer using values from the `Pre-calculated Field Values` section if already provided.
5. Return only the **final numeric answer** (e.g., `14.1%`, `123 million`, `-56.2`).

Do NOT return:
- Reasoning
- Step-by-step text
- Any justification
- Any explanation or code

Just return the final answer on a single line.";

const INSUFFICIENT_DATA: &str = "insufficient data";

/// Assemble the full user prompt from the free-text context, the question,
/// and the analysis bundle. A degraded bundle (one carrying an error) embeds
/// an "insufficient data" marker instead of table sections.
pub fn build_prompt(context: &str, question: &str, bundle: &AnalysisBundle) -> Result<String> {
    let (table_data, numeric_fields, calculations) = match &bundle.error {
        Some(_) => (
            INSUFFICIENT_DATA.to_string(),
            INSUFFICIENT_DATA.to_string(),
            INSUFFICIENT_DATA.to_string(),
        ),
        None => (
            serde_json::to_string_pretty(&bundle.table_data)?,
            bundle.numeric_fields.join(", "),
            serde_json::to_string_pretty(&bundle.calculations)?,
        ),
    };

    Ok(format!(
        "{preamble}\n\n\
         ---\n\n\
         **Financial Context**:\n{context}\n\n\
         **Question**:\n{question}\n\n\
         **Table Data**:\n{table_data}\n\n\
         **Available Numeric Fields**:\n{numeric_fields}\n\n\
         **Pre-calculated Field Values**:\n{calculations}\n\n\
         ---\n\n\
         {instructions}\n",
        preamble = PREAMBLE,
        context = context,
        question = question,
        table_data = table_data,
        numeric_fields = numeric_fields,
        calculations = calculations,
        instructions = INSTRUCTIONS,
    ))
}
