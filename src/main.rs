use std::error::Error;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use wizard::{domain_for, Coordinator, ProcessBuilder, ProcessContext, Response, RouteParams, Services, TemplateRouter,
             WizardConfig, HISTORY_KEY};
use wizard_session::{SessionConfig, SessionRegistry};

mod checkout;

use checkout::{CheckoutScenario, Shop, ALIAS};

/// Pequeño menú interactivo que hace de capa de transporte sobre el
/// escenario de demostración `checkout`. Cada opción equivale a una petición:
/// se construye un coordinador nuevo sobre la sesión activa.
///
/// Opciones soportadas:
/// 1) Iniciar checkout
/// 2) Mostrar un paso
/// 3) Avanzar un paso (con datos JSON opcionales)
/// 4) Ver historial
/// 5) Vaciar / llenar el carrito
/// 6) Nueva sesión
/// 7) Salir
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = WizardConfig::from_env();
    let registry = SessionRegistry::new(SessionConfig::from_env()?);
    let cart_filled = Arc::new(AtomicBool::new(true));
    let services = Services::new(Shop { name: "Tienda de ejemplo".into() });
    let mut session = registry.open_session();
    info!("wizard-cli iniciado: rutas {} / {}, ttl {}s",
          config.display_route,
          config.forward_route,
          registry.config().idle_ttl_secs);

    loop {
        registry.purge_idle();
        if registry.bag(session).is_err() {
            session = registry.open_session();
            println!("La sesión anterior caducó; sesión nueva: {}", session);
        }

        println!("\n== Wizard CLI menu (sesión {}) ==", session);
        println!("1) Iniciar checkout");
        println!("2) Mostrar paso");
        println!("3) Avanzar paso");
        println!("4) Ver historial");
        println!("5) Vaciar / llenar carrito (ahora: {})",
                 if cart_filled.load(Ordering::SeqCst) { "lleno" } else { "vacío" });
        println!("6) Nueva sesión");
        println!("7) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                let mut coordinator = coordinator_for(&registry, session, &config, &cart_filled, &services)?;
                report(coordinator.start(ALIAS, &RouteParams::new()));
            }
            "2" => {
                let step = prompt("Paso (carrito, envio, pago, confirmacion): ")?;
                let mut coordinator = coordinator_for(&registry, session, &config, &cart_filled, &services)?;
                report(coordinator.display(ALIAS, step.trim(), &RouteParams::new()));
            }
            "3" => {
                let step = prompt("Paso a avanzar: ")?;
                let data = prompt("Datos JSON (enter para ninguno, ej: {\"envio\":\"urgente\"}): ")?;
                let mut coordinator = coordinator_for(&registry, session, &config, &cart_filled, &services)?;
                if !data.trim().is_empty() {
                    match serde_json::from_str(data.trim()) {
                        Ok(request) => coordinator.context_mut().set_request(request),
                        Err(e) => { eprintln!("JSON inválido: {}", e); continue; }
                    }
                }
                match coordinator.forward_target(ALIAS, step.trim()) {
                    Ok(target) => println!("POST {}", target),
                    Err(e) => { eprintln!("Error: {}", e); continue; }
                }
                report(coordinator.forward(ALIAS, step.trim()));
            }
            "4" => {
                let bag = registry.bag(session)?;
                let path = format!("{}/{}", domain_for(ALIAS), HISTORY_KEY);
                match bag.get(&path) {
                    Some(history) => println!("Historial: {}", history),
                    None => println!("Historial vacío"),
                }
            }
            "5" => {
                let filled = !cart_filled.load(Ordering::SeqCst);
                cart_filled.store(filled, Ordering::SeqCst);
                println!("Carrito {}", if filled { "lleno" } else { "vacío" });
            }
            "6" => {
                registry.end_session(session);
                session = registry.open_session();
                println!("Sesión nueva: {}", session);
            }
            "7" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

/// Coordinador para una petición sobre la sesión `session`.
fn coordinator_for(registry: &SessionRegistry,
                   session: Uuid,
                   config: &WizardConfig,
                   cart_filled: &Arc<AtomicBool>,
                   services: &Services)
                   -> Result<Coordinator, Box<dyn Error>> {
    let storage = registry.storage_for(session)?;
    let router = Arc::new(TemplateRouter::with_defaults(config));
    let builder = ProcessBuilder::new().with_services(services.clone());
    let mut coordinator = Coordinator::new(router, builder, ProcessContext::new(Box::new(storage)), config.clone());
    coordinator.register_scenario(ALIAS, CheckoutScenario::new(cart_filled.clone()))?;
    Ok(coordinator)
}

fn report(result: wizard::Result<Response>) {
    match result {
        Ok(Response::Redirect { target }) => println!("-> redirección a {}", target),
        Ok(Response::Content { status, body }) => println!("[{}] {}", status, body),
        Err(e) => eprintln!("Error ({}): {}", e.kind().status_code(), e),
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
