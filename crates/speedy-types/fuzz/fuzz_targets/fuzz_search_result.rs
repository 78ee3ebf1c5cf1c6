#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Engine output is untrusted: parsing a result list must never panic
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(results) = serde_json::from_str::<Vec<speedy_types::SearchResult>>(s)
    {
        for result in &results {
            let _ = result.clamped_score();
        }
    }
});
