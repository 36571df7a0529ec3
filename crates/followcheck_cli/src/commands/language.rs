use followcheck::Language;

use crate::config::Config;

pub(crate) fn handle_language(language: &str) -> Result<(), Box<dyn std::error::Error>> {
    let language: Language = language.parse()?;
    let path = Config::save_language(language)?;

    match language {
        Language::En => println!("Language set to English ({})", path.display()),
        Language::Ko => println!("언어가 한국어로 설정되었어요 ({})", path.display()),
    }
    Ok(())
}
