// Archivo: checkout.rs
// Propósito: escenario de demostración "checkout" para el menú interactivo.
// Carrito -> envío -> pago -> confirmación, con un validador que exige
// carrito no vacío y servicios de tienda inyectados en la confirmación.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use wizard::{ActionResult, DelegateStep, ProcessBuilder, ProcessContext, ProcessScenario, ProcessValidator, Response,
             Result, ServiceAware, Services, Step, StepHandler, StepOutcome, StepSource};

pub const ALIAS: &str = "checkout";

/// Datos de la tienda compartidos con los pasos.
pub struct Shop {
    pub name: String,
}

pub struct CheckoutScenario {
    cart_filled: Arc<AtomicBool>,
}

impl CheckoutScenario {
    pub fn new(cart_filled: Arc<AtomicBool>) -> Self {
        Self { cart_filled }
    }
}

impl ProcessScenario for CheckoutScenario {
    fn build(&self, builder: &mut ProcessBuilder) -> Result<()> {
        let cart = self.cart_filled.clone();
        builder.register_step("formulario", || Box::new(FormStep::default()) as Box<dyn Step>)?;
        builder.add("carrito", "formulario")?
               .add("envio", StepSource::instance(DelegateStep::new(Arc::new(ShippingHandler))))?
               .add("pago", StepSource::instance(PaymentStep::default()))?
               .add("confirmacion", StepSource::instance(ConfirmationStep::default()))?
               .set_redirect("/pedido/completado")?
               .validate_with(ProcessValidator::new(move || cart.load(Ordering::SeqCst))
                   .with_message("El carrito está vacío")
                   .with_step_name("carrito"))?;
        Ok(())
    }
}

/// Paso genérico: muestra un formulario vacío y completa al avanzar.
#[derive(Default)]
struct FormStep {
    name: String,
}

impl Step for FormStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn display_action(&self, ctx: &mut ProcessContext) -> Result<Response> {
        Ok(Response::ok(json!({ "paso": self.name, "progreso": ctx.progress()? })))
    }
}

/// El envío lo resuelve un manejador externo que sólo habla JSON.
struct ShippingHandler;

impl StepHandler for ShippingHandler {
    fn display(&self, step: &DelegateStep, ctx: &mut ProcessContext) -> Result<Response> {
        Ok(Response::ok(json!({ "paso": step.name(),
                                "progreso": ctx.progress()?,
                                "opciones": ["estandar", "urgente", "recogida"] })))
    }

    fn forward(&self, _step: &DelegateStep, ctx: &mut ProcessContext) -> Result<JsonValue> {
        let option = ctx.request().and_then(|r| r.get("envio")).and_then(JsonValue::as_str);
        Ok(match option {
            // recogida en tienda: no hay pago online
            Some("recogida") => json!({ "next_step": "confirmacion" }),
            Some(_) => JsonValue::Null,
            None => json!({ "body": { "error": "elige una opción de envío" }, "status": 422 }),
        })
    }
}

#[derive(Default)]
struct PaymentStep {
    name: String,
}

impl Step for PaymentStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn display_action(&self, ctx: &mut ProcessContext) -> Result<Response> {
        Ok(Response::ok(json!({ "paso": self.name, "progreso": ctx.progress()?, "campos": ["tarjeta"] })))
    }

    fn forward_action(&self, ctx: &mut ProcessContext) -> Result<StepOutcome> {
        let card = ctx.request().and_then(|r| r.get("tarjeta")).and_then(JsonValue::as_str).unwrap_or("");
        if card.trim().is_empty() {
            return Ok(Response::content(422, json!({ "paso": self.name, "error": "falta la tarjeta" })).into());
        }
        Ok(ActionResult::complete().into())
    }
}

#[derive(Default)]
struct ConfirmationStep {
    name: String,
    services: Option<Services>,
}

impl Step for ConfirmationStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn display_action(&self, ctx: &mut ProcessContext) -> Result<Response> {
        let shop = self.services.as_ref().and_then(|s| s.get::<Shop>()).map(|s| s.name.clone());
        Ok(Response::ok(json!({ "paso": self.name, "progreso": ctx.progress()?, "tienda": shop })))
    }

    fn as_service_aware(&mut self) -> Option<&mut dyn ServiceAware> {
        Some(self)
    }
}

impl ServiceAware for ConfirmationStep {
    fn set_services(&mut self, services: Services) {
        self.services = Some(services);
    }
}
