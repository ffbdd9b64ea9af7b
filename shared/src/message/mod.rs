//! 通知消息类型定义
//!
//! Every mutation on the server publishes one [`Notification`] which is
//! relayed verbatim to all WebSocket clients as `{ "type", "data" }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Notification name (the `type` field on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    // 客户
    NuevoCliente,
    ClienteActualizado,
    ClienteEliminado,
    // 订单
    NuevaOrden,
    OrdenActualizada,
    OrdenEliminada,
    // 销售
    NuevaVenta,
    VentaAnulada,
    VentaEliminada,
    // 发票
    NuevaFactura,
    FacturaAnulada,
    FacturaEliminada,
    // 赊账单
    NuevoConduce,
    ConduceAnulado,
    ConduceEliminado,
    // 支出
    NuevoGasto,
    GastoActualizado,
    GastoEliminado,
    // 现金 / 配置
    MontoInicialActualizado,
    ConfiguracionEmpresaActualizada,
    ConfiguracionRncActualizada,
    CierreCaja,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NuevoCliente => "nuevo_cliente",
            Self::ClienteActualizado => "cliente_actualizado",
            Self::ClienteEliminado => "cliente_eliminado",
            Self::NuevaOrden => "nueva_orden",
            Self::OrdenActualizada => "orden_actualizada",
            Self::OrdenEliminada => "orden_eliminada",
            Self::NuevaVenta => "nueva_venta",
            Self::VentaAnulada => "venta_anulada",
            Self::VentaEliminada => "venta_eliminada",
            Self::NuevaFactura => "nueva_factura",
            Self::FacturaAnulada => "factura_anulada",
            Self::FacturaEliminada => "factura_eliminada",
            Self::NuevoConduce => "nuevo_conduce",
            Self::ConduceAnulado => "conduce_anulado",
            Self::ConduceEliminado => "conduce_eliminado",
            Self::NuevoGasto => "nuevo_gasto",
            Self::GastoActualizado => "gasto_actualizado",
            Self::GastoEliminado => "gasto_eliminado",
            Self::MontoInicialActualizado => "monto_inicial_actualizado",
            Self::ConfiguracionEmpresaActualizada => "configuracion_empresa_actualizada",
            Self::ConfiguracionRncActualizada => "configuracion_rnc_actualizada",
            Self::CierreCaja => "cierre_caja",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broadcast payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub data: Value,
}

impl Notification {
    /// Build a notification from any serializable payload.
    /// Serialization failures degrade to `null` data.
    pub fn new<T: Serialize>(kind: NotificationType, data: &T) -> Self {
        Self {
            kind,
            data: serde_json::to_value(data).unwrap_or(Value::Null),
        }
    }

    /// Notification for a deleted resource: `{ "id": <id> }`
    pub fn deleted(kind: NotificationType, id: i64) -> Self {
        Self {
            kind,
            data: serde_json::json!({ "id": id }),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_wire_format() {
        let n = Notification::new(
            NotificationType::NuevoConduce,
            &serde_json::json!({ "number": "CON-000001" }),
        );
        let json: Value = serde_json::from_str(&n.to_json()).unwrap();
        assert_eq!(json["type"], "nuevo_conduce");
        assert_eq!(json["data"]["number"], "CON-000001");
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for kind in [
            NotificationType::ConfiguracionEmpresaActualizada,
            NotificationType::MontoInicialActualizado,
            NotificationType::CierreCaja,
            NotificationType::OrdenActualizada,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_deleted_payload() {
        let n = Notification::deleted(NotificationType::GastoEliminado, 42);
        assert_eq!(n.data["id"], 42);
    }
}
