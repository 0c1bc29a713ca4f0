//! Prompt templates for every pipeline stage
//!
//! The wording is deliberately strict about not inventing content: each
//! stage may only restructure or condense what it was given. Tests and
//! downstream stages rely on inputs being embedded verbatim.

/// OCR/layout cleanup of raw extracted file text.
pub fn refine_prompt(raw_text: &str) -> String {
    format!(
        r#"
You are an OCR + academic content extraction engine.
Preserve all formulas, equations, symbols, variables, and definitions exactly as they appear.
Do not summarize.
Do not remove anything.
Do not add any information from your knowledge base.
Just clean layout noise and return structured readable text.

TEXT:
{raw_text}
"#,
        raw_text = raw_text
    )
}

/// Short structured summary of the cleaned voice transcript.
pub fn short_summary_prompt(text: &str) -> String {
    format!(
        r#"
    You are an expert lecturer and note-taker.
    Please provide a **concise summary** of the following lecture text,
    highlighting **key concepts, definitions, formulas, examples, and main points**.
    Keep it short and structured in bullet points or numbered list.

    Lecture Text:
    {text}
    "#,
        text = text
    )
}

/// Faithful summary of the refined file text, restricted to what the
/// professor actually provided.
pub fn professor_summary_prompt(extracted_text: &str) -> String {
    format!(
        r#"
    You are an academic summarization agent.

    RULES:
    - Generate a SHORT and CLEAR summary
    - Use ONLY the provided extracted content
    - Do NOT add explanations, examples, or assumptions
    - The summary must reflect exactly what the professor taught

    Extracted Content:
    {extracted_text}
    "#,
        extracted_text = extracted_text
    )
}

/// Merge the professor summary and the voice summary into final notes.
pub fn synthesis_prompt(prof_summary: &str, voice_summary: &str) -> String {
    format!(
        r#"
    You are an expert academic assistant.

    TASK:
    - Generate FINAL lecture notes by combining the following two sources:
        1. Professor Notes Summary
        2. Teacher Voice Summary
    - Include all important concepts, definitions, formulas, and examples.
    - Avoid repetition.
    - Keep the notes concise but NOT too short; include key details from slides/lecture.
    - Do NOT add any content that is NOT present in the provided summaries.
    - Ensure formulas and technical terms are preserved accurately and written clearly
      (use readable math notation, avoid ambiguity).
    - Bold the main points and italicize definitions where appropriate.

    Professor Notes Summary:
    {prof_summary}

    Teacher Voice Summary:
    {voice_summary}

    FINAL LECTURE NOTES:
    "#,
        prof_summary = prof_summary,
        voice_summary = voice_summary
    )
}

/// Render the final notes as Markdown.
pub fn markdown_prompt(detailed_notes: &str) -> String {
    format!(
        r#"
    You are an expert academic assistant.

    TASK:
    - Convert the following lecture notes to **Markdown format**
    - Use headings for main topics (e.g., ## Topic Name)
    - Use bullet points for main points
    - **Bold the main points**
    - Preserve all formulas accurately and format them for human readability
      (use LaTeX with $...$ for inline and $$...$$ for block equations when possible)
    - Italicize definitions wherever possible
    - Keep the notes concise, clear, and structured
    - Do NOT add any content that is not present in the provided notes

    Lecture Notes:
    {detailed_notes}

    Markdown Notes:
    "#,
        detailed_notes = detailed_notes
    )
}

/// Answer a question strictly from retrieved note chunks.
pub fn chat_prompt(context: &str, question: &str) -> String {
    format!(
        r#"
You are a student assistant.
Answer strictly from the teacher notes.
Keep the answer short and clear.

Teacher Notes:
{context}

Question:
{question}
"#,
        context = context,
        question = question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_embedded_verbatim() {
        let text = "E = mc^2 stays intact";
        assert!(refine_prompt(text).contains(text));
        assert!(short_summary_prompt(text).contains(text));
        assert!(professor_summary_prompt(text).contains(text));
        assert!(markdown_prompt(text).contains(text));
    }

    #[test]
    fn test_synthesis_embeds_both_sources_in_order() {
        let prompt = synthesis_prompt("from slides", "from voice");
        let slides_at = prompt.find("from slides").unwrap();
        let voice_at = prompt.find("from voice").unwrap();
        assert!(slides_at < voice_at);
        assert!(prompt.contains("FINAL LECTURE NOTES:"));
    }

    #[test]
    fn test_chat_prompt_shape() {
        let prompt = chat_prompt("chunk one chunk two", "What is ATP?");
        assert!(prompt.starts_with("\nYou are a student assistant."));
        assert!(prompt.contains("Teacher Notes:\nchunk one chunk two"));
        assert!(prompt.contains("Question:\nWhat is ATP?"));
    }

    #[test]
    fn test_refine_forbids_summarizing() {
        let prompt = refine_prompt("raw");
        assert!(prompt.contains("Do not summarize."));
        assert!(prompt.contains("Do not remove anything."));
    }
}
