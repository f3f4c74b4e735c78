//! Attribute sheet layouts per agrupación.
//!
//! Every PIM asset sheet shares a block of base properties; some agrupaciones
//! add discipline-specific columns (thermal power for HVAC units, extinguisher
//! agent and charge for fire protection, pump data for water supply, ...).
//! Unknown agrupaciones fall back to the base block.

/// One property column of an asset sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetColumn {
    /// Attribute name in the record.
    pub key: &'static str,
    /// Header shown in the sheet.
    pub label: &'static str,
}

const fn col(key: &'static str, label: &'static str) -> SheetColumn {
    SheetColumn { key, label }
}

/// Columns shared by every agrupación, in sheet order.
pub const BASE_PROPERTY_COLUMNS: &[SheetColumn] = &[
    col("codigoEquipo", "CODIGO DE EQUIPO"),
    col("descripcion", "DESCRIPCIÓN"),
    col("marca", "MARCA"),
    col("modelo", "MODELO"),
    col("fechaInstalacion", "FECHA INSTALACIÓN"),
    col("precioCompra", "PRECIO DE COMPRA"),
    col("vidaUtil", "VIDA ÚTIL"),
    col("estado", "ESTADO"),
    col("ubicacion", "UBICACION"),
    col("descripcionUbicacion", "DESCRIPCION UBICACION"),
];

/// Classification columns printed before the property block.
pub const CLASSIFICATION_COLUMNS: &[SheetColumn] = &[
    col("sistemaMaximo", "Nivel 2 = Sistema de Maximo"),
    col("subsistemaMaximo", "Nivel 3 = Subsistema de Maximo"),
    col("tipoActivoMaximo", "Nivel 4 = Tipo de Activo de Maximo"),
    col("agrupacionMaximo", "Agrupacion Maximo"),
    col("codigoBIMMaximo", "Codigo BIM Maximo"),
];

const RUTA: SheetColumn = col("ruta", "RUTA");
const RUTA_NUEVA: SheetColumn = col("rutaNueva", "RUTA NUEVA");
const POTENCIA_KW: SheetColumn = col("potenciaKw", "POTENCIA (KW)");

const CLIMATIZADORA: &[SheetColumn] = &[col("potenciaTermicaMax", "POTENCIA TÉRMICA MAX")];
const UNIDAD_INTERIOR: &[SheetColumn] = &[
    col("potenciaTermicaModoFrio", "POTENCIA TÉRMICA MODO FRIO"),
    col("potenciaTotalPorZona", "POTENCIA TOTAL POR ZONA"),
    col("potenciaTermicaModoCalor", "POTENCIA TERMICA MODO CALOR"),
];
const VENTILACION: &[SheetColumn] = &[RUTA, RUTA_NUEVA, POTENCIA_KW];
const CONDUCTO: &[SheetColumn] = &[RUTA];
const EXTINTOR: &[SheetColumn] = &[
    RUTA,
    col("tipoDeAgenteExtintor", "TIPO DE AGENTE EXTINTOR"),
    col("pesoCargaKg", "PESO/CARGA (KG)"),
    col("fechaDeRetimbrado", "FECHA DE RETIMBRADO"),
];
const GRUPO_PRESION: &[SheetColumn] = &[
    col("nBombasDeAgua", "Nº BOMBAS DE AGUA"),
    col("potenciaIndividualBombas", "POTENCIA INDIVIDUAL BOMBAS"),
    col("marcaBombasDeAgua", "MARCA BOMBAS DE AGUA"),
    col("modeloBombasDeAgua", "MODELO BOMBAS DE AGUA"),
    col("nSerieBombasDeAgua", "Nº SERIE BOMBAS DE AGUA"),
    col("zonaQueAbastece", "ZONA QUE ABASTECE"),
];
const PUERTA_AUTOMATICA: &[SheetColumn] = &[
    col("sistemaDeAccionamiento", "SISTEMA DE ACCIONAMIENTO"),
    col("velocidad015", "VELOCIDAD > 0.15"),
    col("afeccionADora", "AFECCIÓN A DORA"),
];
const LINEA: &[SheetColumn] = &[col("longitud", "LONGITUD")];

fn extra_columns(agrupacion: &str) -> &'static [SheetColumn] {
    match agrupacion {
        "01_00_01" => CLIMATIZADORA,
        "01_00_02" => UNIDAD_INTERIOR,
        "01_00_04" | "01_00_05" => VENTILACION,
        "01_00_06" => CONDUCTO,
        "02_02_04" => EXTINTOR,
        "03_01_05" => GRUPO_PRESION,
        "04_00_01" => PUERTA_AUTOMATICA,
        "10_00_01" => LINEA,
        _ => &[],
    }
}

/// Property columns for an agrupación: the base block followed by its
/// discipline-specific columns.
pub fn columns_for_agrupacion(agrupacion: &str) -> Vec<SheetColumn> {
    let mut columns = BASE_PROPERTY_COLUMNS.to_vec();
    columns.extend_from_slice(extra_columns(agrupacion.trim()));
    columns
}
