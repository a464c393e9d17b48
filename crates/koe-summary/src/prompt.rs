/// Build the summarization instruction for a transcript
///
/// The transcript is embedded verbatim after the instruction and the
/// expected JSON shape.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "以下の文字起こしテキストを要約してください。\n\
         \n\
         JSON形式で返してください：\n\
         {{\n  \"summary\": \"全体の要約を100文字程度で\",\n  \"key_points\": [\"重要なポイント1\", \"重要なポイント2\", \"重要なポイント3\"]\n}}\n\
         \n\
         テキスト:\n\
         {transcript}\n"
    )
}
