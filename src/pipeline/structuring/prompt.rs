//! Prompt templates for the language model.

/// Instruction block for prescription extraction. The OCR text is appended
/// after it by `build_prescription_prompt`.
pub const PRESCRIPTION_INSTRUCTIONS: &str = r#"You are a medical prescription analyzer.

The prescription text below may be written fully or partly in a language other than English (for example Hindi, Kannada, Tamil or Bengali). First translate the whole text to English, then extract structured information from the English translation.

Focus on:
1. Medicine names
2. Dosage information
3. Frequency (morning, afternoon, evening, night)
4. Duration
5. Special instructions

Respond with ONLY a valid JSON object in exactly this format, with no additional text, explanations or Markdown:

{
  "medicines": [
    {
      "name": "Medicine Name",
      "confidence": 95,
      "dosage": "Dosage Amount",
      "frequency": {
        "morning": true,
        "afternoon": false,
        "evening": false,
        "night": true
      },
      "duration": "Duration Period",
      "specialInstructions": "Any special instructions"
    }
  ],
  "patientInfo": {
    "name": "Patient Name if available",
    "age": "Patient Age if available",
    "gender": "Patient Gender if available"
  },
  "doctorInfo": {
    "name": "Doctor Name if available",
    "specialization": "Specialization if available"
  },
  "diagnosis": "Diagnosis if available",
  "date": "Prescription date if available"
}

Use null for any value that is not present in the text.

"confidence" is an integer between 0 and 100 saying how certain you are about that medicine's information:
- 90-100: clear, standard medicine names and complete information
- 70-89: slightly unclear writing but recognizable medicine names
- below 70: unclear writing, ambiguous names, or missing information"#;

/// Full prompt for prescription extraction.
pub fn build_prescription_prompt(ocr_text: &str) -> String {
    format!(
        "{PRESCRIPTION_INSTRUCTIONS}\n\nPrescription text:\n{ocr_text}\n\n\
         Remember: respond with ONLY the JSON object, no additional text."
    )
}

/// Prompt for the drug summary fallback. The name is inserted verbatim.
pub fn build_drug_summary_prompt(medicine_name: &str) -> String {
    format!(
        r#"You are a medical information assistant. Provide a concise summary about the medicine/drug: {medicine_name}

Format your response as a JSON object with the following fields:
{{
    "brand_name": "Brand name (if known)",
    "generic_name": "Generic name",
    "manufacturer": "Manufacturer (if known)",
    "active_ingredients": "Key active ingredients",
    "purpose": "Main medical use (1-2 sentences)",
    "warnings": "Key warnings (1-2 sentences)",
    "dosage_administration": "Standard dosage (1 sentence)",
    "pregnancy_risk": "Pregnancy category (if known)"
}}

Guidelines:
1. Keep all responses brief and to the point
2. Focus on essential information only
3. Use simple, clear language
4. If unsure about any field, use null
5. Maximum 2 sentences per field"#
    )
}
