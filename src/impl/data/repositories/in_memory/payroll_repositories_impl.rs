use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::domain::entities::employee_balance_adjustment::EmployeeBalanceAdjustment;
use crate::domain::entities::employee_payable_item::EmployeePayableItem;
use crate::domain::entities::employee_payment::{EmployeePayment, EmployeePaymentAllocation};
use crate::domain::entities::ids::{
    DepartmentId, EmployeeId, EmployeePayableItemId, EmployeePaymentId, EmployeeSalaryComponentId,
    PayrollRunEmployeeDetailId, PayrollRunId, PayslipId, PositionId, SalaryComponentDefinitionId,
};
use crate::domain::entities::organization::{Department, Employee, Position};
use crate::domain::entities::payroll_run::{PayrollRun, PayrollRunEmployeeDetail};
use crate::domain::entities::payslip::Payslip;
use crate::domain::entities::salary_component::{EmployeeSalaryComponent, SalaryComponentDefinition};
use crate::domain::repositories::payroll_repositories::{
    DepartmentRepository, EmployeeBalanceAdjustmentRepository, EmployeePayableItemRepository,
    EmployeePaymentRepository, EmployeeRepository, EmployeeSalaryComponentRepository,
    PayrollRunEmployeeDetailRepository, PayrollRunRepository, PayslipRepository,
    PositionRepository, SalaryComponentDefinitionRepository,
};
use crate::errors::{
    DepartmentNotFound, EmployeeNotFound, EmployeePayableItemNotFound, EmployeePaymentNotFound,
    EmployeeSalaryComponentNotFound, PayrollRunNotFound, PayslipNotFound, PositionNotFound,
    SalaryComponentDefinitionNotFound,
};

use super::store::InMemoryStore;

#[async_trait]
impl DepartmentRepository for InMemoryStore {
    async fn get(&self, id: DepartmentId) -> Result<Department, ServerError> {
        self.departments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DepartmentNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Department>, ServerError> {
        Ok(self.departments.read().await.values().cloned().collect())
    }

    async fn save(&self, department: Department) -> Result<(), ServerError> {
        self.departments.write().await.insert(department.id, department);
        Ok(())
    }
}

#[async_trait]
impl PositionRepository for InMemoryStore {
    async fn get(&self, id: PositionId) -> Result<Position, ServerError> {
        self.positions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PositionNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Position>, ServerError> {
        Ok(self.positions.read().await.values().cloned().collect())
    }

    async fn save(&self, position: Position) -> Result<(), ServerError> {
        self.positions.write().await.insert(position.id, position);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn get(&self, id: EmployeeId) -> Result<Employee, ServerError> {
        self.employees.read().await.get(&id).cloned().ok_or_else(|| EmployeeNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Employee>, ServerError> {
        Ok(self.employees.read().await.values().cloned().collect())
    }

    async fn save(&self, employee: Employee) -> Result<(), ServerError> {
        self.employees.write().await.insert(employee.id, employee);
        Ok(())
    }
}

#[async_trait]
impl SalaryComponentDefinitionRepository for InMemoryStore {
    async fn get(&self, id: SalaryComponentDefinitionId) -> Result<SalaryComponentDefinition, ServerError> {
        self.salary_component_definitions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| SalaryComponentDefinitionNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<SalaryComponentDefinition>, ServerError> {
        Ok(self.salary_component_definitions.read().await.values().cloned().collect())
    }

    async fn save(&self, definition: SalaryComponentDefinition) -> Result<(), ServerError> {
        self.salary_component_definitions.write().await.insert(definition.id, definition);
        Ok(())
    }
}

#[async_trait]
impl EmployeeSalaryComponentRepository for InMemoryStore {
    async fn get(&self, id: EmployeeSalaryComponentId) -> Result<EmployeeSalaryComponent, ServerError> {
        self.employee_salary_components
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| EmployeeSalaryComponentNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<EmployeeSalaryComponent>, ServerError> {
        Ok(self.employee_salary_components.read().await.values().cloned().collect())
    }

    async fn save(&self, assignment: EmployeeSalaryComponent) -> Result<(), ServerError> {
        self.employee_salary_components.write().await.insert(assignment.id, assignment);
        Ok(())
    }
}

#[async_trait]
impl PayrollRunRepository for InMemoryStore {
    async fn get(&self, id: PayrollRunId) -> Result<PayrollRun, ServerError> {
        self.payroll_runs.read().await.get(&id).cloned().ok_or_else(|| PayrollRunNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<PayrollRun>, ServerError> {
        Ok(self.payroll_runs.read().await.values().cloned().collect())
    }

    async fn save(&self, run: PayrollRun) -> Result<(), ServerError> {
        self.payroll_runs.write().await.insert(run.id, run);
        Ok(())
    }

    async fn delete(&self, id: PayrollRunId) -> Result<(), ServerError> {
        self.payroll_runs.write().await.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl PayrollRunEmployeeDetailRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<PayrollRunEmployeeDetail>, ServerError> {
        Ok(self.payroll_run_employee_details.read().await.values().cloned().collect())
    }

    async fn save(&self, detail: PayrollRunEmployeeDetail) -> Result<(), ServerError> {
        self.payroll_run_employee_details.write().await.insert(detail.id, detail);
        Ok(())
    }

    async fn delete(&self, id: PayrollRunEmployeeDetailId) -> Result<(), ServerError> {
        self.payroll_run_employee_details.write().await.remove(&id);
        Ok(())
    }

    async fn delete_by_run(&self, run_id: PayrollRunId) -> Result<(), ServerError> {
        self.payroll_run_employee_details.write().await.retain(|_, d| d.payroll_run_id != run_id);
        Ok(())
    }
}

#[async_trait]
impl EmployeePayableItemRepository for InMemoryStore {
    async fn get(&self, id: EmployeePayableItemId) -> Result<EmployeePayableItem, ServerError> {
        self.employee_payable_items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| EmployeePayableItemNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<EmployeePayableItem>, ServerError> {
        Ok(self.employee_payable_items.read().await.values().cloned().collect())
    }

    async fn save(&self, item: EmployeePayableItem) -> Result<(), ServerError> {
        self.employee_payable_items.write().await.insert(item.id, item);
        Ok(())
    }
}

#[async_trait]
impl EmployeePaymentRepository for InMemoryStore {
    async fn get(&self, id: EmployeePaymentId) -> Result<EmployeePayment, ServerError> {
        self.employee_payments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| EmployeePaymentNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<EmployeePayment>, ServerError> {
        Ok(self.employee_payments.read().await.values().cloned().collect())
    }

    async fn save(&self, payment: EmployeePayment) -> Result<(), ServerError> {
        self.employee_payments.write().await.insert(payment.id, payment);
        Ok(())
    }

    async fn list_allocations(&self) -> Result<Vec<EmployeePaymentAllocation>, ServerError> {
        Ok(self.employee_payment_allocations.read().await.values().cloned().collect())
    }

    async fn save_allocation(&self, allocation: EmployeePaymentAllocation) -> Result<(), ServerError> {
        self.employee_payment_allocations.write().await.insert(allocation.id, allocation);
        Ok(())
    }
}

#[async_trait]
impl EmployeeBalanceAdjustmentRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<EmployeeBalanceAdjustment>, ServerError> {
        Ok(self.employee_balance_adjustments.read().await.values().cloned().collect())
    }

    async fn save(&self, adjustment: EmployeeBalanceAdjustment) -> Result<(), ServerError> {
        self.employee_balance_adjustments.write().await.insert(adjustment.id, adjustment);
        Ok(())
    }
}

#[async_trait]
impl PayslipRepository for InMemoryStore {
    async fn get(&self, id: PayslipId) -> Result<Payslip, ServerError> {
        self.payslips.read().await.get(&id).cloned().ok_or_else(|| PayslipNotFound::new(&id))
    }

    async fn list(&self) -> Result<Vec<Payslip>, ServerError> {
        Ok(self.payslips.read().await.values().cloned().collect())
    }

    async fn save(&self, payslip: Payslip) -> Result<(), ServerError> {
        self.payslips.write().await.insert(payslip.id, payslip);
        Ok(())
    }
}
