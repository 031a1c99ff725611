use dispatcharr_grid::preview::PreviewController;
use log::debug;

use crate::error::CliError;

/// Evaluate a search/replace on `text` and print the outcome.
pub fn preview(text: String, pattern: String, replacement: String) -> Result<(), CliError> {
    let (controller, mut requests) = PreviewController::new();
    controller.set_text(text);
    controller.set_pattern(pattern);
    controller.set_replacement(replacement);
    controller.commit();

    while let Ok(request) = requests.try_recv() {
        debug!("Committed preview request {:?}", request);
    }

    let committed = controller.committed().unwrap_or_default();
    let result = controller.result().unwrap_or_default();
    println!("input:  {}", committed.text);
    println!("output: {}", result);
    if result == committed.text {
        println!("(no change)");
    }
    Ok(())
}
