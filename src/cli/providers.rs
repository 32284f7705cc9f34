use unillm::ProviderKey;

pub fn handle_providers() {
    println!("{:<10} {:<18} {}", "KEY", "NAME", "VARIABLES");
    for key in ProviderKey::ALL {
        let info = key.info();
        println!("{:<10} {:<18} {}", key.as_str(), info.name, info.env_vars.join(", "));
    }
}
